//! Repository for prefix search over handles, event tags, and locations.

use gatherly_core::search::Suggestion;
use gatherly_core::types::DbId;
use sqlx::{FromRow, PgPool};

/// Internal row for user suggestions.
#[derive(FromRow)]
struct UserRow {
    id: DbId,
    handle: String,
    display_name: String,
    image_data: Option<String>,
}

/// Internal row for event suggestions (from the public mirror only).
#[derive(FromRow)]
struct EventRow {
    event_id: DbId,
    tag: String,
    location_name: String,
    image_data: Option<String>,
}

/// Provides prefix-range suggestion queries.
pub struct SearchRepo;

impl SearchRepo {
    /// Suggest users whose handle starts with `term`.
    ///
    /// `term` must already be LIKE-escaped (see
    /// [`gatherly_core::search::escape_like`]); the trailing `%` is
    /// appended here.
    pub async fn suggest_users(
        pool: &PgPool,
        term: &str,
        limit: i64,
    ) -> Result<Vec<Suggestion>, sqlx::Error> {
        let pattern = format!("{term}%");
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, handle, display_name, image_data \
             FROM users \
             WHERE handle ILIKE $1 AND is_active \
             ORDER BY handle \
             LIMIT $2",
        )
        .bind(&pattern)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Suggestion::User {
                id: r.id,
                handle: r.handle,
                display_name: r.display_name,
                image_data: r.image_data,
            })
            .collect())
    }

    /// Suggest public events whose tag or location starts with `term`.
    ///
    /// Stored tags carry a leading `#`, so the tag pattern re-adds it.
    pub async fn suggest_events(
        pool: &PgPool,
        term: &str,
        limit: i64,
    ) -> Result<Vec<Suggestion>, sqlx::Error> {
        let tag_pattern = format!("#{term}%");
        let location_pattern = format!("{term}%");
        let rows = sqlx::query_as::<_, EventRow>(
            "SELECT event_id, tag, location_name, image_data \
             FROM public_events \
             WHERE tag ILIKE $1 OR location_name ILIKE $2 \
             ORDER BY created_at DESC \
             LIMIT $3",
        )
        .bind(&tag_pattern)
        .bind(&location_pattern)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Suggestion::Event {
                id: r.event_id,
                tag: r.tag,
                location_name: r.location_name,
                image_data: r.image_data,
            })
            .collect())
    }

    /// Combined user + event suggestions, users first.
    pub async fn suggest(
        pool: &PgPool,
        term: &str,
        limit: i64,
    ) -> Result<Vec<Suggestion>, sqlx::Error> {
        let mut out = Self::suggest_users(pool, term, limit).await?;
        let remaining = limit - out.len() as i64;
        if remaining > 0 {
            out.extend(Self::suggest_events(pool, term, remaining).await?);
        }
        Ok(out)
    }
}
