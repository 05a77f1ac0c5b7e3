//! Repository for the `follows` edge table.
//!
//! A directed follow edge is one row; "A follows B" and "B is followed by
//! A" are the same fact, so the edge can never be half-written. Duplicate
//! follows and unfollows of a non-edge are no-ops by construction.

use gatherly_core::types::DbId;
use sqlx::PgPool;

/// Provides operations on follow edges.
pub struct FollowRepo;

impl FollowRepo {
    /// Create the edge `follower -> followee`.
    ///
    /// Returns `true` if the edge was newly created, `false` if it already
    /// existed. Self-follows are rejected by the caller before any write
    /// (and by a CHECK constraint as a backstop).
    pub async fn follow(
        pool: &PgPool,
        follower_id: DbId,
        followee_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO follows (follower_id, followee_id) \
             VALUES ($1, $2) \
             ON CONFLICT (follower_id, followee_id) DO NOTHING",
        )
        .bind(follower_id)
        .bind(followee_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove the edge `follower -> followee`.
    ///
    /// Returns `true` if an edge was removed, `false` if none existed.
    pub async fn unfollow(
        pool: &PgPool,
        follower_id: DbId,
        followee_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followee_id = $2")
            .bind(follower_id)
            .bind(followee_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether `follower -> followee` exists.
    pub async fn is_following(
        pool: &PgPool,
        follower_id: DbId,
        followee_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let exists: Option<i64> = sqlx::query_scalar(
            "SELECT 1 FROM follows WHERE follower_id = $1 AND followee_id = $2",
        )
        .bind(follower_id)
        .bind(followee_id)
        .fetch_optional(pool)
        .await?;
        Ok(exists.is_some())
    }

    /// Ids of everyone `user_id` follows.
    pub async fn following_ids(pool: &PgPool, user_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT followee_id FROM follows WHERE follower_id = $1")
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Ids of everyone following `user_id`.
    pub async fn follower_ids(pool: &PgPool, user_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT follower_id FROM follows WHERE followee_id = $1")
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
