use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::extractors::{require_roles, CurrentUser},
    error::ApiError,
    state::AppState,
    users::Role,
};

use super::{dto::LogQuery, repo, repo_types::LogEntry};

const LOG_PAGE_LIMIT: i64 = 100;

pub fn routes() -> Router<AppState> {
    Router::new().route("/logs", get(list_logs))
}

/// Maps a filter category to the concrete action tags it covers. "all" and
/// unknown categories leave the listing unfiltered.
fn actions_for(filter: &str) -> Option<&'static [&'static str]> {
    match filter {
        "login" => Some(&["login", "logout"]),
        "user" => Some(&["user_created", "user_updated", "user_deleted"]),
        "content" => Some(&["content_created", "content_updated", "content_deleted"]),
        _ => None,
    }
}

#[instrument(skip(state, user))]
pub async fn list_logs(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<LogQuery>,
) -> Result<Json<Vec<LogEntry>>, ApiError> {
    require_roles(&user, &[Role::Admin])?;

    let actions = query.filter.as_deref().and_then(actions_for);
    let entries = repo::list_recent(&state.db, actions, LOG_PAGE_LIMIT).await?;
    Ok(Json(entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_category_covers_sessions() {
        assert_eq!(actions_for("login"), Some(&["login", "logout"][..]));
    }

    #[test]
    fn user_category_covers_account_mutations() {
        assert_eq!(
            actions_for("user"),
            Some(&["user_created", "user_updated", "user_deleted"][..])
        );
    }

    #[test]
    fn content_category_covers_content_mutations() {
        assert_eq!(
            actions_for("content"),
            Some(&["content_created", "content_updated", "content_deleted"][..])
        );
    }

    #[test]
    fn all_and_unknown_are_unfiltered() {
        assert_eq!(actions_for("all"), None);
        assert_eq!(actions_for("everything"), None);
        assert_eq!(actions_for(""), None);
    }
}
