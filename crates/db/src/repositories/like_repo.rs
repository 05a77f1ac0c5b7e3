//! Repository for the `likes` table.

use gatherly_core::types::DbId;
use sqlx::PgPool;

/// Outcome of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeToggle {
    Added,
    Removed,
}

/// Provides set-membership operations on event likes.
pub struct LikeRepo;

impl LikeRepo {
    /// Flip membership of `(event_id, user_id)` in the likes set.
    ///
    /// Insert wins when the row is absent; otherwise the existing row is
    /// deleted. Toggling twice always restores the original set.
    pub async fn toggle(
        pool: &PgPool,
        event_id: DbId,
        user_id: DbId,
    ) -> Result<LikeToggle, sqlx::Error> {
        let inserted = sqlx::query(
            "INSERT INTO likes (event_id, user_id) \
             VALUES ($1, $2) \
             ON CONFLICT (event_id, user_id) DO NOTHING",
        )
        .bind(event_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        if inserted.rows_affected() > 0 {
            return Ok(LikeToggle::Added);
        }

        sqlx::query("DELETE FROM likes WHERE event_id = $1 AND user_id = $2")
            .bind(event_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(LikeToggle::Removed)
    }

    /// Ids of everyone who liked an event.
    pub async fn liker_ids(pool: &PgPool, event_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT user_id FROM likes WHERE event_id = $1 ORDER BY created_at")
            .bind(event_id)
            .fetch_all(pool)
            .await
    }

    /// Number of likes on an event.
    pub async fn count(pool: &PgPool, event_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE event_id = $1")
                .bind(event_id)
                .fetch_one(pool)
                .await?;
        Ok(count.unwrap_or(0))
    }
}
