use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Content, ContentStatus};

impl Content {
    /// List content, newest first, optionally restricted to one status.
    pub async fn list(db: &PgPool, status: Option<ContentStatus>) -> anyhow::Result<Vec<Content>> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, Content>(
                    r#"
                    SELECT id, title, body, status, author_id, author_name, created_at, updated_at
                    FROM content
                    WHERE status = $1
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(status)
                .fetch_all(db)
                .await?
            }
            None => {
                sqlx::query_as::<_, Content>(
                    r#"
                    SELECT id, title, body, status, author_id, author_name, created_at, updated_at
                    FROM content
                    ORDER BY created_at DESC
                    "#,
                )
                .fetch_all(db)
                .await?
            }
        };
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Content>> {
        let content = sqlx::query_as::<_, Content>(
            r#"
            SELECT id, title, body, status, author_id, author_name, created_at, updated_at
            FROM content
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(content)
    }

    pub async fn create(
        db: &PgPool,
        title: &str,
        body: &str,
        status: ContentStatus,
        author_id: Uuid,
        author_name: &str,
    ) -> anyhow::Result<Content> {
        let content = sqlx::query_as::<_, Content>(
            r#"
            INSERT INTO content (title, body, status, author_id, author_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, body, status, author_id, author_name, created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(body)
        .bind(status)
        .bind(author_id)
        .bind(author_name)
        .fetch_one(db)
        .await?;
        Ok(content)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<u64> {
        let result = sqlx::query(r#"DELETE FROM content WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}
