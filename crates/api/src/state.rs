use std::sync::Arc;

use crate::config::ServerConfig;
use crate::places::PlacesClient;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: gatherly_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (browser clients).
    pub ws_manager: Arc<WsManager>,
    /// Centralized event bus for publishing social events.
    pub event_bus: Arc<gatherly_events::EventBus>,
    /// Client for the external places / mapping API.
    pub places: PlacesClient,
}
