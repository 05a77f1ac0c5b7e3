//! Row models and persistence DTOs.

pub mod comment;
pub mod event;
pub mod notification;
pub mod session;
pub mod user;
