use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;

/// Publication state of a content record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "content_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Draft,
    Published,
    Archived,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContentStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            _ => Err(ApiError::validation(format!(
                "Invalid status: '{s}'. Expected one of: draft, published, archived"
            ))),
        }
    }
}

/// Content record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Content {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub status: ContentStatus,
    pub author_id: Uuid,     // weak reference, survives author deletion
    pub author_name: String, // snapshot at creation, not kept in sync
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_exact_lowercase_only() {
        assert_eq!("draft".parse::<ContentStatus>().unwrap(), ContentStatus::Draft);
        assert_eq!(
            "published".parse::<ContentStatus>().unwrap(),
            ContentStatus::Published
        );
        assert_eq!(
            "archived".parse::<ContentStatus>().unwrap(),
            ContentStatus::Archived
        );
        assert!("Published".parse::<ContentStatus>().is_err());
        assert!("deleted".parse::<ContentStatus>().is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ContentStatus::Archived).unwrap(),
            "\"archived\""
        );
    }
}
