use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, put},
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
};

use super::{
    dto::UpdateRoleRequest,
    repo_types::{Role, User},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", put(update_user_role).delete(delete_user))
}

#[instrument(skip(state, user))]
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<User>>, ApiError> {
    require_roles(&user, &[Role::Admin])?;

    let users = User::list_all(&state.db).await?;
    Ok(Json(users))
}

#[instrument(skip(state, headers, payload))]
pub async fn update_user_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    // Id format is checked before authentication touches storage.
    let target_id = parse_user_id(&id)?;

    let user = authenticate(&state, &headers).await?;
    require_roles(&user, &[Role::Admin])?;

    let role: Role = payload.role.parse()?;

    let updated = User::update_role(&state.db, target_id, role).await?;
    if updated == 0 {
        return Err(ApiError::not_found("User not found"));
    }

    record(
        &state.db,
        user.id,
        Action::UserUpdated,
        json!({
            "target_user_id": target_id,
            "new_role": role,
            "ip": client_ip(&headers),
        }),
    )
    .await;

    info!(admin_id = %user.id, %target_id, %role, "user role updated");
    Ok(Json(json!({ "message": "User role updated successfully" })))
}

#[instrument(skip(state, headers))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let target_id = parse_user_id(&id)?;

    let user = authenticate(&state, &headers).await?;
    require_roles(&user, &[Role::Admin])?;

    if target_id == user.id {
        warn!(admin_id = %user.id, "self-deletion refused");
        return Err(ApiError::validation("Cannot delete your own account"));
    }

    let deleted = User::delete(&state.db, target_id).await?;
    if deleted == 0 {
        return Err(ApiError::not_found("User not found"));
    }

    record(
        &state.db,
        user.id,
        Action::UserDeleted,
        json!({
            "target_user_id": target_id,
            "ip": client_ip(&headers),
        }),
    )
    .await;

    info!(admin_id = %user.id, %target_id, "user deleted");
    Ok(Json(json!({ "message": "User deleted successfully" })))
}

fn parse_user_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::validation("Invalid user ID"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_must_be_a_uuid() {
        assert!(parse_user_id("not-a-uuid").is_err());
        assert!(parse_user_id("").is_err());

        let id = Uuid::new_v4();
        assert_eq!(parse_user_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn bad_user_id_is_a_validation_error() {
        let err = parse_user_id("42").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(err.to_string(), "Invalid user ID");
    }
}
