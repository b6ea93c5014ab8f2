use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use tracing::warn;

use crate::{
    error::ApiError,
    state::AppState,
    users::{Role, User},
};

use super::jwt::JwtKeys;

/// Pulls the session token out of a request: `Authorization: Bearer` is
/// preferred, a `token=` cookie is the fallback.
fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(auth) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(token) = auth.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|c| c.strip_prefix("token="))
        .map(|t| t.to_string())
}

/// Authentication resolver: verifies the token, then re-fetches the account
/// on every call so role changes and deletions apply on the next request.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let token = token_from_headers(headers)
        .ok_or_else(|| ApiError::authentication("No token provided"))?;

    let keys = JwtKeys::from_ref(state);
    let claims = keys
        .verify(&token)
        .ok_or_else(|| ApiError::authentication("Invalid token"))?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %claims.sub, "token for missing user");
            ApiError::authentication("User not found")
        })?;

    Ok(user)
}

/// Resolved request identity, passed by value into the handler.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let user = authenticate(state, &parts.headers).await?;
        Ok(CurrentUser(user))
    }
}

/// Authorization gate: the single place role sets are checked. Resolver
/// failures are 401; a resolved identity outside the set is 403.
pub fn require_roles(user: &User, allowed: &[Role]) -> Result<(), ApiError> {
    if allowed.contains(&user.role) {
        return Ok(());
    }
    let wanted = allowed
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    warn!(user_id = %user.id, role = %user.role, required = %wanted, "access denied");
    Err(ApiError::forbidden(format!(
        "Access denied. Required roles: {wanted}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn make_user(role: Role) -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id: Uuid::new_v4(),
            name: "Bob".into(),
            email: "b@x.com".into(),
            password_hash: String::new(),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn bearer_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc123"),
        );
        headers.insert(header::COOKIE, HeaderValue::from_static("token=cookie456"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn cookie_is_the_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; token=cookie456; lang=en"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("cookie456"));
    }

    #[test]
    fn no_token_sources_yields_none() {
        assert_eq!(token_from_headers(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(token_from_headers(&headers), None);
    }

    #[test]
    fn gate_passes_a_member_role() {
        let user = make_user(Role::Editor);
        assert!(require_roles(&user, &[Role::Admin, Role::Editor]).is_ok());
    }

    #[test]
    fn gate_rejects_with_403_naming_the_role_set() {
        let user = make_user(Role::Viewer);
        let err = require_roles(&user, &[Role::Admin, Role::Editor]).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
        assert_eq!(
            err.to_string(),
            "Access denied. Required roles: admin, editor"
        );
    }

    #[test]
    fn gate_rejection_is_distinct_from_authentication_failure() {
        let user = make_user(Role::Viewer);
        let err = require_roles(&user, &[Role::Admin]).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::FORBIDDEN);
        assert_ne!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
