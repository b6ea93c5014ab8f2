use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// One audit record, joined with the acting user's name at read time.
/// `user_name` is null once the user has been deleted.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LogEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub details: serde_json::Value,
    pub ip: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub user_name: Option<String>,
}
