use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    activity::services::{client_ip, record, Action},
    auth::extractors::{authenticate, require_roles, CurrentUser},
    error::ApiError,
    state::AppState,
    users::Role,
};

use super::{
    dto::{ContentQuery, CreateContentRequest},
    repo_types::{Content, ContentStatus},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/content", get(list_content).post(create_content))
        .route("/content/:id", delete(delete_content))
}

/// Which records a listing may return for a given role and requested
/// status. Viewers are pinned to published content no matter what the
/// query asks for; a status that parses to no known variant matches
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusFilter {
    Any,
    Only(ContentStatus),
    Unmatched,
}

fn status_filter(role: Role, requested: Option<&str>) -> StatusFilter {
    if role == Role::Viewer {
        return StatusFilter::Only(ContentStatus::Published);
    }
    match requested {
        None => StatusFilter::Any,
        Some(raw) => match raw.parse::<ContentStatus>() {
            Ok(status) => StatusFilter::Only(status),
            Err(_) => StatusFilter::Unmatched,
        },
    }
}

/// Whether `user_id` with `role` may delete content authored by `author_id`.
fn can_delete(role: Role, user_id: Uuid, author_id: Uuid) -> bool {
    match role {
        Role::Admin => true,
        Role::Editor => user_id == author_id,
        Role::Viewer => false,
    }
}

#[instrument(skip(state, user))]
pub async fn list_content(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ContentQuery>,
) -> Result<Json<Vec<Content>>, ApiError> {
    require_roles(&user, &[Role::Admin, Role::Editor, Role::Viewer])?;

    let items = match status_filter(user.role, query.status.as_deref()) {
        StatusFilter::Any => Content::list(&state.db, None).await?,
        StatusFilter::Only(status) => Content::list(&state.db, Some(status)).await?,
        StatusFilter::Unmatched => Vec::new(),
    };
    Ok(Json(items))
}

#[instrument(skip(state, user, headers, payload))]
pub async fn create_content(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    headers: HeaderMap,
    Json(payload): Json<CreateContentRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    require_roles(&user, &[Role::Admin, Role::Editor])?;

    if payload.title.is_empty() || payload.body.is_empty() {
        return Err(ApiError::validation("Title and body are required"));
    }

    let status = match payload.status.as_deref() {
        Some(raw) => raw.parse::<ContentStatus>()?,
        None => ContentStatus::Draft,
    };

    let content = Content::create(
        &state.db,
        &payload.title,
        &payload.body,
        status,
        user.id,
        &user.name,
    )
    .await?;

    record(
        &state.db,
        user.id,
        Action::ContentCreated,
        json!({
            "content_id": content.id,
            "title": content.title,
            "status": content.status,
            "ip": client_ip(&headers),
        }),
    )
    .await;

    info!(user_id = %user.id, content_id = %content.id, "content created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Content created successfully", "id": content.id })),
    ))
}

#[instrument(skip(state, headers))]
pub async fn delete_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    // Id format is checked before authentication touches storage.
    let content_id =
        Uuid::parse_str(&id).map_err(|_| ApiError::validation("Invalid content ID"))?;

    let user = authenticate(&state, &headers).await?;
    require_roles(&user, &[Role::Admin, Role::Editor])?;

    let content = Content::find_by_id(&state.db, content_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Content not found"))?;

    if !can_delete(user.role, user.id, content.author_id) {
        warn!(user_id = %user.id, %content_id, "ownership check failed");
        return Err(ApiError::forbidden("You can only delete your own content"));
    }

    let deleted = Content::delete(&state.db, content_id).await?;
    if deleted == 0 {
        return Err(ApiError::not_found("Content not found"));
    }

    record(
        &state.db,
        user.id,
        Action::ContentDeleted,
        json!({
            "content_id": content_id,
            "title": content.title,
            "ip": client_ip(&headers),
        }),
    )
    .await;

    info!(user_id = %user.id, %content_id, "content deleted");
    Ok(Json(json!({ "message": "Content deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewer_is_pinned_to_published() {
        assert_eq!(
            status_filter(Role::Viewer, None),
            StatusFilter::Only(ContentStatus::Published)
        );
        // A requested draft filter must not widen a viewer's view.
        assert_eq!(
            status_filter(Role::Viewer, Some("draft")),
            StatusFilter::Only(ContentStatus::Published)
        );
        assert_eq!(
            status_filter(Role::Viewer, Some("archived")),
            StatusFilter::Only(ContentStatus::Published)
        );
    }

    #[test]
    fn editors_and_admins_filter_freely() {
        assert_eq!(status_filter(Role::Editor, None), StatusFilter::Any);
        assert_eq!(
            status_filter(Role::Admin, Some("draft")),
            StatusFilter::Only(ContentStatus::Draft)
        );
        assert_eq!(
            status_filter(Role::Editor, Some("published")),
            StatusFilter::Only(ContentStatus::Published)
        );
    }

    #[test]
    fn unknown_status_matches_nothing() {
        assert_eq!(
            status_filter(Role::Admin, Some("bogus")),
            StatusFilter::Unmatched
        );
    }

    #[test]
    fn admins_delete_anything() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert!(can_delete(Role::Admin, me, other));
        assert!(can_delete(Role::Admin, me, me));
    }

    #[test]
    fn editors_delete_only_their_own() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert!(can_delete(Role::Editor, me, me));
        assert!(!can_delete(Role::Editor, me, other));
    }

    #[test]
    fn viewers_delete_nothing() {
        let me = Uuid::new_v4();
        assert!(!can_delete(Role::Viewer, me, me));
    }
}
