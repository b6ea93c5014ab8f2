use axum::http::HeaderMap;
use serde_json::Value;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use super::repo;

/// Tags for audit entries written by this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    UserRegistered,
    UserUpdated,
    UserDeleted,
    ContentCreated,
    ContentDeleted,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::UserRegistered => "user_registered",
            Self::UserUpdated => "user_updated",
            Self::UserDeleted => "user_deleted",
            Self::ContentCreated => "content_created",
            Self::ContentDeleted => "content_deleted",
        }
    }
}

/// Best-effort append: a failed write is logged operationally and dropped,
/// never surfaced to the request that triggered it.
pub async fn record(db: &PgPool, user_id: Uuid, action: Action, details: Value) {
    let ip = details
        .get("ip")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();
    if let Err(e) = repo::insert(db, user_id, action.as_str(), &details, &ip).await {
        error!(error = %e, action = action.as_str(), "failed to record activity");
    }
}

/// Client address for audit details, when the proxy forwards one.
pub fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn action_tags() {
        assert_eq!(Action::Login.as_str(), "login");
        assert_eq!(Action::UserRegistered.as_str(), "user_registered");
        assert_eq!(Action::UserUpdated.as_str(), "user_updated");
        assert_eq!(Action::UserDeleted.as_str(), "user_deleted");
        assert_eq!(Action::ContentCreated.as_str(), "content_created");
        assert_eq!(Action::ContentDeleted.as_str(), "content_deleted");
    }

    #[test]
    fn client_ip_prefers_forwarded_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.9"));
        assert_eq!(client_ip(&headers), "203.0.113.9");
    }

    #[test]
    fn client_ip_defaults_to_unknown() {
        assert_eq!(client_ip(&HeaderMap::new()), "unknown");
    }
}
