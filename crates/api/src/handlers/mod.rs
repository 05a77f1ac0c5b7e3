//! HTTP request handlers, grouped by resource.

pub mod auth;
pub mod events;
pub mod feed;
pub mod notifications;
pub mod places;
pub mod search;
pub mod social;
pub mod users;
