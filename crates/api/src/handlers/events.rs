//! Event creation, detail, edit, delete, and the public listing.
//!
//! Every event is written to the owner's private table; public events
//! additionally get a mirror row that the feed and search read. The
//! repository keeps both copies in sync inside one transaction, so
//! handlers here only decide what to write and what to announce on the
//! bus afterwards.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use gatherly_core::error::CoreError;
use gatherly_core::image::{decode_upload, process_upload, COVER_BOUNDS};
use gatherly_core::tags::normalize_tag;
use gatherly_core::types::DbId;
use gatherly_db::models::comment::Comment;
use gatherly_db::models::event::{Event, NewEvent, PublicEvent, UpdateEvent};
use gatherly_db::repositories::{CommentRepo, EventRepo, LikeRepo, UserRepo};
use gatherly_events::bus::{EVENT_CREATED, EVENT_DELETED};
use gatherly_events::SocialEvent;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum length of an event description.
const MAX_DESCRIPTION_LEN: usize = 2000;

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub tag: String,
    #[serde(default)]
    pub description: String,
    pub event_date: NaiveDate,
    pub event_time: NaiveTime,
    pub location_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default = "default_public")]
    pub is_public: bool,
    /// Base64 (or data-URL) cover upload; scaled and re-encoded.
    pub image_upload: Option<String>,
    /// Pasted external image URL; stored verbatim, never fetched.
    pub image_url: Option<String>,
    /// Handles of users to tag on the event. Unknown handles reject the
    /// whole request.
    #[serde(default)]
    pub tagged_handles: Vec<String>,
}

fn default_public() -> bool {
    true
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateEventRequest {
    pub tag: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<NaiveTime>,
    pub location_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_public: Option<bool>,
    pub image_upload: Option<String>,
    pub image_url: Option<String>,
    /// Replaces the whole tagged-user list when present.
    pub tagged_handles: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// Detail view of one event: the row the viewer is allowed to see plus its
/// social state.
#[derive(Debug, Serialize)]
pub struct EventDetailResponse {
    pub event: serde_json::Value,
    pub tagged_user_ids: Vec<DbId>,
    pub liker_ids: Vec<DbId>,
    pub like_count: usize,
    pub comments: Vec<Comment>,
}

/// `POST /events`
pub async fn create_event(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Event>>)> {
    let tag = normalize_tag(&req.tag).map_err(AppError::Core)?;
    validate_description(&req.description)?;
    if req.location_name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Location is required".into(),
        )));
    }

    let image_data = intake_image(&req.image_upload, &req.image_url)?;
    let tagged_user_ids = resolve_tagged(&state, &req.tagged_handles).await?;

    let event = EventRepo::create(
        &state.pool,
        &NewEvent {
            owner_id: auth.user_id,
            tag,
            description: req.description,
            image_data,
            event_date: req.event_date,
            event_time: req.event_time,
            location_name: req.location_name,
            latitude: req.latitude,
            longitude: req.longitude,
            is_public: req.is_public,
            tagged_user_ids,
        },
    )
    .await?;

    tracing::info!(event_id = event.id, owner_id = auth.user_id, tag = %event.tag, "Event created");

    if event.is_public {
        state.event_bus.publish(
            SocialEvent::new(EVENT_CREATED)
                .with_event(event.id)
                .with_actor(auth.user_id),
        );
    }

    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// `GET /events`
///
/// Public listing, newest first.
pub async fn list_public_events(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<DataResponse<Vec<PublicEvent>>>> {
    let limit = query
        .limit
        .unwrap_or(state.config.feed_limit)
        .clamp(1, state.config.feed_limit);
    let events = EventRepo::list_public(&state.pool, limit).await?;
    Ok(Json(DataResponse { data: events }))
}

/// `GET /events/{id}`
///
/// The owner reads their private copy; everyone else reads the public
/// mirror. A private event is indistinguishable from a missing one for
/// non-owners.
pub async fn get_event(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EventDetailResponse>>> {
    let event = visible_event_json(&state, &auth, id).await?;

    let tagged_user_ids = EventRepo::tagged_user_ids(&state.pool, id).await?;
    let liker_ids = LikeRepo::liker_ids(&state.pool, id).await?;
    let comments = CommentRepo::list_for_event(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: EventDetailResponse {
            event,
            tagged_user_ids,
            like_count: liker_ids.len(),
            liker_ids,
            comments,
        },
    }))
}

/// `PUT /events/{id}`
pub async fn update_event(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(req): Json<UpdateEventRequest>,
) -> AppResult<Json<DataResponse<Event>>> {
    let existing = owned_event(&state, &auth, id).await?;

    let tag = match &req.tag {
        Some(raw) => Some(normalize_tag(raw).map_err(AppError::Core)?),
        None => None,
    };
    if let Some(description) = &req.description {
        validate_description(description)?;
    }
    if let Some(location) = &req.location_name {
        if location.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "Location is required".into(),
            )));
        }
    }

    let image_data = intake_image(&req.image_upload, &req.image_url)?;
    let tagged_user_ids = match &req.tagged_handles {
        Some(handles) => Some(resolve_tagged(&state, handles).await?),
        None => None,
    };

    let input = UpdateEvent {
        tag,
        description: req.description,
        image_data,
        event_date: req.event_date,
        event_time: req.event_time,
        location_name: req.location_name,
        latitude: req.latitude,
        longitude: req.longitude,
        is_public: req.is_public,
        tagged_user_ids,
    };

    let updated = EventRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "event", id }))?;

    // Visibility flips move the event in or out of everyone's feed.
    if existing.is_public != updated.is_public {
        let event_type = if updated.is_public {
            EVENT_CREATED
        } else {
            EVENT_DELETED
        };
        state.event_bus.publish(
            SocialEvent::new(event_type)
                .with_event(updated.id)
                .with_actor(auth.user_id),
        );
    }

    Ok(Json(DataResponse { data: updated }))
}

/// `DELETE /events/{id}`
pub async fn delete_event(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = owned_event(&state, &auth, id).await?;

    EventRepo::delete(&state.pool, id).await?;
    tracing::info!(event_id = id, owner_id = auth.user_id, "Event deleted");

    if existing.is_public {
        state.event_bus.publish(
            SocialEvent::new(EVENT_DELETED)
                .with_event(id)
                .with_actor(auth.user_id),
        );
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Load an event the caller owns, or fail with 404/403.
async fn owned_event(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<Event> {
    let event = EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "event", id }))?;
    if event.owner_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the event owner may modify it".into(),
        )));
    }
    Ok(event)
}

/// Serialize whichever copy of the event the viewer may see.
async fn visible_event_json(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
) -> AppResult<serde_json::Value> {
    if let Some(event) = EventRepo::find_by_id(&state.pool, id).await? {
        if event.owner_id == auth.user_id {
            return serde_json::to_value(event)
                .map_err(|e| AppError::InternalError(e.to_string()));
        }
    }
    let public = EventRepo::get_public(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "event", id }))?;
    serde_json::to_value(public).map_err(|e| AppError::InternalError(e.to_string()))
}

fn validate_description(description: &str) -> AppResult<()> {
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Description must be at most {MAX_DESCRIPTION_LEN} characters"
        ))));
    }
    Ok(())
}

/// Turn an upload or a pasted URL into the stored `image_data` value.
fn intake_image(
    upload: &Option<String>,
    url: &Option<String>,
) -> AppResult<Option<String>> {
    match (upload, url) {
        (Some(payload), _) => {
            let bytes = decode_upload(payload).map_err(AppError::Core)?;
            Ok(Some(
                process_upload(&bytes, COVER_BOUNDS).map_err(AppError::Core)?,
            ))
        }
        (None, Some(url)) => Ok(Some(url.clone())),
        (None, None) => Ok(None),
    }
}

/// Resolve tagged handles to stable user ids. Any unknown handle rejects
/// the request so a typo cannot silently drop a tag.
async fn resolve_tagged(state: &AppState, handles: &[String]) -> AppResult<Vec<DbId>> {
    if handles.is_empty() {
        return Ok(Vec::new());
    }

    let owned: Vec<String> = handles.to_vec();
    let resolved = UserRepo::resolve_handles(&state.pool, &owned).await?;
    let by_handle: HashMap<&str, DbId> = resolved
        .iter()
        .map(|u| (u.handle.as_str(), u.id))
        .collect();

    let mut ids = Vec::with_capacity(handles.len());
    let mut unknown = Vec::new();
    for handle in handles {
        match by_handle.get(handle.as_str()) {
            Some(&id) => {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            None => unknown.push(handle.as_str()),
        }
    }

    if !unknown.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown tagged user(s): {}",
            unknown.join(", ")
        ))));
    }
    Ok(ids)
}
