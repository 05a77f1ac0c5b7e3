//! Repository for the `comments` table.

use gatherly_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::Comment;

/// Select list + join for reading comments with the author's handle.
const SELECT: &str = "SELECT c.id, c.event_id, c.author_id, u.handle AS author_handle, \
                             c.body, c.created_at \
                      FROM comments c \
                      JOIN users u ON u.id = c.author_id";

/// Provides operations on event comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Append a comment and bump the event's denormalized `comment_count`
    /// atomically, in one transaction.
    pub async fn add(
        pool: &PgPool,
        event_id: DbId,
        author_id: DbId,
        body: &str,
    ) -> Result<Comment, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let comment_id: DbId = sqlx::query_scalar(
            "INSERT INTO comments (event_id, author_id, body) \
             VALUES ($1, $2, $3) \
             RETURNING id",
        )
        .bind(event_id)
        .bind(author_id)
        .bind(body)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE events SET comment_count = comment_count + 1 WHERE id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;

        let query = format!("{SELECT} WHERE c.id = $1");
        let comment = sqlx::query_as::<_, Comment>(&query)
            .bind(comment_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(comment)
    }

    /// List an event's comments, oldest first (display order).
    pub async fn list_for_event(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!("{SELECT} WHERE c.event_id = $1 ORDER BY c.created_at ASC");
        sqlx::query_as::<_, Comment>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }
}
