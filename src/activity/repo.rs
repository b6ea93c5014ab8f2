use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::LogEntry;

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    action: &str,
    details: &serde_json::Value,
    ip: &str,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO activity_logs (user_id, action, details, ip)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(user_id)
    .bind(action)
    .bind(details)
    .bind(ip)
    .execute(db)
    .await?;
    Ok(())
}

/// Newest entries first, optionally restricted to a set of action tags.
pub async fn list_recent(
    db: &PgPool,
    actions: Option<&[&str]>,
    limit: i64,
) -> anyhow::Result<Vec<LogEntry>> {
    let rows = match actions {
        Some(actions) => {
            let actions: Vec<String> = actions.iter().map(|a| a.to_string()).collect();
            sqlx::query_as::<_, LogEntry>(
                r#"
                SELECT l.id, l.user_id, l.action, l.details, l.ip, l.timestamp,
                       u.name AS user_name
                FROM activity_logs l
                LEFT JOIN users u ON u.id = l.user_id
                WHERE l.action = ANY($1)
                ORDER BY l.timestamp DESC
                LIMIT $2
                "#,
            )
            .bind(actions)
            .bind(limit)
            .fetch_all(db)
            .await?
        }
        None => {
            sqlx::query_as::<_, LogEntry>(
                r#"
                SELECT l.id, l.user_id, l.action, l.details, l.ip, l.timestamp,
                       u.name AS user_name
                FROM activity_logs l
                LEFT JOIN users u ON u.id = l.user_id
                ORDER BY l.timestamp DESC
                LIMIT $1
                "#,
            )
            .bind(limit)
            .fetch_all(db)
            .await?
        }
    };
    Ok(rows)
}
