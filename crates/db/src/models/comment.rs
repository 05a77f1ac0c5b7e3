//! Comment entity model.

use gatherly_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `comments` table, joined with the author's handle for
/// display.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub event_id: DbId,
    pub author_id: DbId,
    pub author_handle: String,
    pub body: String,
    pub created_at: Timestamp,
}
