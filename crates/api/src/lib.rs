//! Gatherly HTTP API.
//!
//! Axum service exposing auth, events, follows, likes/comments/shares,
//! the home feed, notifications, search, and places autocomplete, plus a
//! WebSocket endpoint for live push. The router is built by
//! [`router::build_app_router`] so integration tests run against the same
//! stack as the binary.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod places;
pub mod push;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod ws;
