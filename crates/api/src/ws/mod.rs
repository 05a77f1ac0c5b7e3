//! WebSocket infrastructure for live updates.
//!
//! Provides connection management, heartbeat monitoring, and the HTTP
//! upgrade handler used by Axum routes. Connected clients receive push
//! frames (new public events, notifications, unread counts) and re-read
//! the affected resource over HTTP -- the server never streams state,
//! only change signals plus small snapshots.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
