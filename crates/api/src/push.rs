//! Event-to-WebSocket push routing.
//!
//! [`NotificationPush`] subscribes to the social event bus and forwards
//! each event to connected clients: addressed events go to their
//! recipients together with a fresh unread-notification count, and
//! feed-affecting events are broadcast so every client can re-read the
//! feed. Push failures are logged and dropped -- clients recover by
//! re-reading over HTTP.

use std::sync::Arc;

use axum::extract::ws::Message;
use gatherly_core::types::DbId;
use gatherly_db::repositories::NotificationRepo;
use gatherly_db::DbPool;
use gatherly_events::bus::{EVENT_CREATED, EVENT_DELETED};
use gatherly_events::SocialEvent;
use tokio::sync::broadcast;

use crate::ws::WsManager;

/// Routes social events to connected WebSocket clients.
pub struct NotificationPush {
    pool: DbPool,
    ws_manager: Arc<WsManager>,
}

impl NotificationPush {
    /// Create a new push router with the given database pool and WebSocket
    /// manager.
    pub fn new(pool: DbPool, ws_manager: Arc<WsManager>) -> Self {
        Self { pool, ws_manager }
    }

    /// Run the main routing loop.
    ///
    /// Subscribes to the event bus via `receiver` and processes each event.
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](gatherly_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<SocialEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = self.route_event(&event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to push event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification push lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification push shutting down");
                    break;
                }
            }
        }
    }

    /// Deliver a single event.
    async fn route_event(&self, event: &SocialEvent) -> Result<(), sqlx::Error> {
        if event.recipient_user_ids.is_empty() {
            // Unaddressed events signal a feed change to everyone.
            if event.event_type == EVENT_CREATED || event.event_type == EVENT_DELETED {
                let frame = serde_json::json!({
                    "type": "feed.changed",
                    "event_type": event.event_type,
                    "event_id": event.event_id,
                });
                self.ws_manager
                    .broadcast(Message::Text(frame.to_string().into()))
                    .await;
            }
            return Ok(());
        }

        for &user_id in &event.recipient_user_ids {
            self.push_to_user(user_id, event).await?;
        }
        Ok(())
    }

    /// Push an addressed event to one recipient, with the recipient's
    /// current unread count so the navigation badge stays exact without a
    /// second round-trip.
    async fn push_to_user(&self, user_id: DbId, event: &SocialEvent) -> Result<(), sqlx::Error> {
        let unread_count = NotificationRepo::unread_count(&self.pool, user_id).await?;

        let frame = serde_json::json!({
            "type": event.event_type,
            "event_id": event.event_id,
            "actor_user_id": event.actor_user_id,
            "payload": event.payload,
            "unread_count": unread_count,
        });

        let sent = self
            .ws_manager
            .send_to_user(user_id, Message::Text(frame.to_string().into()))
            .await;
        tracing::debug!(
            user_id,
            connections = sent,
            event_type = %event.event_type,
            "Pushed event to user"
        );
        Ok(())
    }
}
