//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`SocialEvent`]s.
//! It is designed to be shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use gatherly_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Event type names
// ---------------------------------------------------------------------------

/// A public event was created (feed clients should refresh).
pub const EVENT_CREATED: &str = "event.created";

/// A public event was deleted.
pub const EVENT_DELETED: &str = "event.deleted";

/// An event gained a like.
pub const EVENT_LIKED: &str = "event.liked";

/// An event gained a comment.
pub const EVENT_COMMENTED: &str = "event.commented";

/// An event was shared with recipients.
pub const EVENT_SHARED: &str = "event.shared";

/// A user gained a follower.
pub const USER_FOLLOWED: &str = "user.followed";

// ---------------------------------------------------------------------------
// SocialEvent
// ---------------------------------------------------------------------------

/// A domain event that occurred on the platform.
///
/// Constructed via [`SocialEvent::new`] and enriched with the builder
/// methods [`with_event`](SocialEvent::with_event),
/// [`with_actor`](SocialEvent::with_actor),
/// [`with_recipients`](SocialEvent::with_recipients), and
/// [`with_payload`](SocialEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialEvent {
    /// Dot-separated event name, e.g. `"event.liked"`.
    pub event_type: String,

    /// The social event (happening) this concerns, if any.
    pub event_id: Option<DbId>,

    /// Id of the user that triggered the event.
    pub actor_user_id: Option<DbId>,

    /// Users who should be pushed a frame for this event. Empty means
    /// "broadcast to everyone connected" (e.g. new public events).
    pub recipient_user_ids: Vec<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl SocialEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            event_id: None,
            actor_user_id: None,
            recipient_user_ids: Vec::new(),
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the concerned happening.
    pub fn with_event(mut self, event_id: DbId) -> Self {
        self.event_id = Some(event_id);
        self
    }

    /// Attach the acting user.
    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    /// Address the event to specific users.
    pub fn with_recipients(mut self, user_ids: Vec<DbId>) -> Self {
        self.recipient_user_ids = user_ids;
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`SocialEvent`].
pub struct EventBus {
    sender: broadcast::Sender<SocialEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// every read path re-derives its state from the database, so a missed
    /// push only delays a refresh.
    pub fn publish(&self, event: SocialEvent) {
        // Ignore the SendError -- it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<SocialEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
