//! Notification entity model and DTOs.

use gatherly_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub kind: String,
    pub actor_id: DbId,
    pub actor_handle: String,
    pub event_id: Option<DbId>,
    pub event_tag: String,
    pub message: String,
    pub image_data: Option<String>,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for appending a notification.
#[derive(Debug, Clone)]
pub struct NewNotification {
    /// Recipient.
    pub user_id: DbId,
    pub kind: &'static str,
    pub actor_id: DbId,
    pub actor_handle: String,
    pub event_id: Option<DbId>,
    pub event_tag: String,
    pub message: String,
    /// Snapshot of the event's cover image at notification time.
    pub image_data: Option<String>,
}
