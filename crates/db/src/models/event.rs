//! Event entity models and DTOs.
//!
//! Every event has a private row in `events`; public events additionally
//! have a field-identical mirror row in `public_events`, which is what the
//! feed and search read.

use chrono::{NaiveDate, NaiveTime};
use gatherly_core::feed::Authored;
use gatherly_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `events` table (the owner's private copy).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub owner_id: DbId,
    pub tag: String,
    pub description: String,
    pub image_data: Option<String>,
    pub event_date: NaiveDate,
    pub event_time: NaiveTime,
    pub location_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_public: bool,
    pub comment_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A feed/search row read from the `public_events` mirror, joined with the
/// owner's handle and live like/comment counts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PublicEvent {
    pub event_id: DbId,
    pub owner_id: DbId,
    pub owner_handle: String,
    pub tag: String,
    pub description: String,
    pub image_data: Option<String>,
    pub event_date: NaiveDate,
    pub event_time: NaiveTime,
    pub location_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub comment_count: i32,
    pub like_count: i64,
    pub created_at: Timestamp,
}

impl Authored for PublicEvent {
    fn owner_id(&self) -> DbId {
        self.owner_id
    }
}

/// DTO for inserting an event. Fields are already validated and
/// normalized (tag carries its leading `#`, image is a stored-ready URL or
/// data URL, tagged handles are resolved to ids).
#[derive(Debug)]
pub struct NewEvent {
    pub owner_id: DbId,
    pub tag: String,
    pub description: String,
    pub image_data: Option<String>,
    pub event_date: NaiveDate,
    pub event_time: NaiveTime,
    pub location_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_public: bool,
    pub tagged_user_ids: Vec<DbId>,
}

/// DTO for event edits. `None` fields are left untouched; `tagged_user_ids`
/// replaces the whole tag list when present.
#[derive(Debug, Default)]
pub struct UpdateEvent {
    pub tag: Option<String>,
    pub description: Option<String>,
    pub image_data: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<NaiveTime>,
    pub location_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_public: Option<bool>,
    pub tagged_user_ids: Option<Vec<DbId>>,
}
