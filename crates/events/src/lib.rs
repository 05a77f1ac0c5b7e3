//! Gatherly in-process event bus.
//!
//! Social actions (event created, liked, commented, shared, user followed)
//! are published as [`SocialEvent`]s on an [`EventBus`] backed by
//! `tokio::sync::broadcast`. The API server's push task subscribes and
//! forwards the events to connected WebSocket clients.

pub mod bus;

pub use bus::{EventBus, SocialEvent};
