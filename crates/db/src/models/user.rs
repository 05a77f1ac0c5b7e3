//! User entity model and DTOs.

use gatherly_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserSummary`] or the profile response types instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub handle: String,
    pub display_name: String,
    pub image_data: Option<String>,
    pub password_hash: String,
    pub is_active: bool,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe, public-facing user representation (no email, no hash).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSummary {
    pub id: DbId,
    pub handle: String,
    pub display_name: String,
    pub image_data: Option<String>,
}

/// DTO for inserting a new user at registration.
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub handle: String,
    pub display_name: String,
    pub password_hash: String,
}

/// DTO for profile edits from the settings view. `None` fields are left
/// untouched.
#[derive(Debug, Default)]
pub struct UpdateProfile {
    pub display_name: Option<String>,
    pub handle: Option<String>,
    pub image_data: Option<String>,
}
