//! Repository for the `events` table and its `public_events` mirror.
//!
//! Every write that touches both copies runs in a single transaction, so
//! the mirror can never diverge from the private row: the mirror exists
//! iff `is_public`, and its fields always match.

use gatherly_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::event::{Event, NewEvent, PublicEvent, UpdateEvent};

/// Column list for `events` queries.
const COLUMNS: &str = "id, owner_id, tag, description, image_data, event_date, event_time, \
                       location_name, latitude, longitude, is_public, comment_count, \
                       created_at, updated_at";

/// Select list + joins for reading the public mirror with owner handle and
/// live counts.
const PUBLIC_SELECT: &str =
    "SELECT p.event_id, p.owner_id, u.handle AS owner_handle, p.tag, p.description, \
            p.image_data, p.event_date, p.event_time, p.location_name, p.latitude, \
            p.longitude, e.comment_count, \
            (SELECT COUNT(*) FROM likes l WHERE l.event_id = p.event_id) AS like_count, \
            p.created_at \
     FROM public_events p \
     JOIN events e ON e.id = p.event_id \
     JOIN users u ON u.id = p.owner_id";

/// Provides CRUD operations for events and their public mirror.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new event: the private row always, tagged users, and the
    /// mirror row iff public. All in one transaction.
    pub async fn create(pool: &PgPool, input: &NewEvent) -> Result<Event, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO events (owner_id, tag, description, image_data, event_date, \
                                 event_time, location_name, latitude, longitude, is_public)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(input.owner_id)
            .bind(&input.tag)
            .bind(&input.description)
            .bind(&input.image_data)
            .bind(input.event_date)
            .bind(input.event_time)
            .bind(&input.location_name)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.is_public)
            .fetch_one(&mut *tx)
            .await?;

        Self::replace_tagged_users(&mut tx, event.id, &input.tagged_user_ids).await?;

        if event.is_public {
            Self::insert_mirror(&mut tx, &event).await?;
        }

        tx.commit().await?;
        Ok(event)
    }

    /// Find a private event row by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Apply an edit. Only non-`None` fields are changed; the mirror is
    /// re-synced in the same transaction (created, rewritten, or dropped as
    /// the visibility flag dictates).
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE events SET
                tag = COALESCE($2, tag),
                description = COALESCE($3, description),
                image_data = COALESCE($4, image_data),
                event_date = COALESCE($5, event_date),
                event_time = COALESCE($6, event_time),
                location_name = COALESCE($7, location_name),
                latitude = COALESCE($8, latitude),
                longitude = COALESCE($9, longitude),
                is_public = COALESCE($10, is_public),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(&input.tag)
            .bind(&input.description)
            .bind(&input.image_data)
            .bind(input.event_date)
            .bind(input.event_time)
            .bind(&input.location_name)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.is_public)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(event) = event else {
            return Ok(None);
        };

        if let Some(tagged) = &input.tagged_user_ids {
            sqlx::query("DELETE FROM event_tagged_users WHERE event_id = $1")
                .bind(event.id)
                .execute(&mut *tx)
                .await?;
            Self::replace_tagged_users(&mut tx, event.id, tagged).await?;
        }

        // Rewrite the mirror from scratch so it matches the private row
        // exactly, or disappears when the event went private.
        sqlx::query("DELETE FROM public_events WHERE event_id = $1")
            .bind(event.id)
            .execute(&mut *tx)
            .await?;
        if event.is_public {
            Self::insert_mirror(&mut tx, &event).await?;
        }

        tx.commit().await?;
        Ok(Some(event))
    }

    /// Delete an event. Foreign keys cascade to the mirror, tagged users,
    /// likes, and comments.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether a public mirror row exists for the event.
    pub async fn has_public_copy(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let exists: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM public_events WHERE event_id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(exists.is_some())
    }

    /// List all public events, newest first.
    pub async fn list_public(pool: &PgPool, limit: i64) -> Result<Vec<PublicEvent>, sqlx::Error> {
        let query = format!("{PUBLIC_SELECT} ORDER BY p.created_at DESC LIMIT $1");
        sqlx::query_as::<_, PublicEvent>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Read a single event from the public mirror.
    pub async fn get_public(pool: &PgPool, id: DbId) -> Result<Option<PublicEvent>, sqlx::Error> {
        let query = format!("{PUBLIC_SELECT} WHERE p.event_id = $1");
        sqlx::query_as::<_, PublicEvent>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's own private rows (both visibilities), newest first.
    pub async fn list_owned(pool: &PgPool, owner_id: DbId) -> Result<Vec<Event>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM events WHERE owner_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Event>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// List a user's public events from the mirror, newest first.
    pub async fn list_public_by_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<PublicEvent>, sqlx::Error> {
        let query = format!("{PUBLIC_SELECT} WHERE p.owner_id = $1 ORDER BY p.created_at DESC");
        sqlx::query_as::<_, PublicEvent>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// List public events in which a user is tagged, newest first.
    pub async fn list_tagged(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<PublicEvent>, sqlx::Error> {
        let query = format!(
            "{PUBLIC_SELECT} \
             JOIN event_tagged_users t ON t.event_id = p.event_id \
             WHERE t.user_id = $1 \
             ORDER BY p.created_at DESC"
        );
        sqlx::query_as::<_, PublicEvent>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Ids of the users tagged on an event.
    pub async fn tagged_user_ids(pool: &PgPool, event_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT user_id FROM event_tagged_users WHERE event_id = $1")
            .bind(event_id)
            .fetch_all(pool)
            .await
    }

    /// Insert the tagged-user rows for an event.
    async fn replace_tagged_users(
        tx: &mut Transaction<'_, Postgres>,
        event_id: DbId,
        user_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        for user_id in user_ids {
            sqlx::query(
                "INSERT INTO event_tagged_users (event_id, user_id) \
                 VALUES ($1, $2) \
                 ON CONFLICT (event_id, user_id) DO NOTHING",
            )
            .bind(event_id)
            .bind(user_id)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    /// Copy the private row's fields into the mirror.
    async fn insert_mirror(
        tx: &mut Transaction<'_, Postgres>,
        event: &Event,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO public_events (event_id, owner_id, tag, description, image_data, \
                                        event_date, event_time, location_name, latitude, \
                                        longitude, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(event.id)
        .bind(event.owner_id)
        .bind(&event.tag)
        .bind(&event.description)
        .bind(&event.image_data)
        .bind(event.event_date)
        .bind(event.event_time)
        .bind(&event.location_name)
        .bind(event.latitude)
        .bind(event.longitude)
        .bind(event.created_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
