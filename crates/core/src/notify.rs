//! Notification kinds and message rendering.
//!
//! Notifications are created by the social action that triggers them and
//! addressed to the event owner (or, for shares, to each chosen recipient).
//! The rendered message is denormalized onto the notification row so the
//! list view needs no joins.

use serde::{Deserialize, Serialize};

/// What kind of social action produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Like,
    Comment,
    Share,
}

impl NotificationKind {
    /// Stable string form stored in the `notifications.kind` column.
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Like => "like",
            NotificationKind::Comment => "comment",
            NotificationKind::Share => "share",
        }
    }
}

/// Render the human-readable message for a notification.
pub fn render_message(kind: NotificationKind, actor_handle: &str, event_tag: &str) -> String {
    match kind {
        NotificationKind::Like => format!("@{actor_handle} liked your event {event_tag}"),
        NotificationKind::Comment => {
            format!("@{actor_handle} commented on your event {event_tag}")
        }
        NotificationKind::Share => {
            format!("@{actor_handle} shared the event {event_tag} with you")
        }
    }
}
