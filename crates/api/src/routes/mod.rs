//! Route tables, one module per resource.

pub mod auth;
pub mod events;
pub mod feed;
pub mod health;
pub mod notifications;
pub mod places;
pub mod search;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Assemble every versioned API route under one router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/events", events::router())
        .nest("/notifications", notifications::router())
        .nest("/search", search::router())
        .nest("/places", places::router())
        .merge(feed::router())
}
