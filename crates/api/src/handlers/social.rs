//! Likes, comments, and shares.
//!
//! Each social action does its durable writes first (the like row, the
//! comment plus counter bump, the notification rows), then publishes a
//! bus event for live push. Acting on your own event never notifies you.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use gatherly_core::error::CoreError;
use gatherly_core::notify::{render_message, NotificationKind};
use gatherly_core::types::DbId;
use gatherly_db::models::comment::Comment;
use gatherly_db::models::event::Event;
use gatherly_db::models::notification::NewNotification;
use gatherly_db::repositories::{
    CommentRepo, EventRepo, LikeRepo, LikeToggle, NotificationRepo, UserRepo,
};
use gatherly_events::bus::{EVENT_COMMENTED, EVENT_LIKED, EVENT_SHARED};
use gatherly_events::SocialEvent;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum length of a comment body.
const MAX_COMMENT_LEN: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct ShareRequest {
    /// Recipients by stable user id (a handle rename must not re-route a
    /// share in flight).
    pub recipient_user_ids: Vec<DbId>,
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub liked: bool,
    pub like_count: i64,
}

#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub shared_with: Vec<DbId>,
}

/// `POST /events/{id}/like`
///
/// Pure toggle: liking twice restores the original state. Only a fresh
/// like on someone else's event produces a notification.
pub async fn toggle_like(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<LikeResponse>>> {
    let event = visible_event(&state, &auth, id).await?;

    let toggle = LikeRepo::toggle(&state.pool, event.id, auth.user_id).await?;
    let liked = toggle == LikeToggle::Added;

    if liked && auth.user_id != event.owner_id {
        let message = render_message(NotificationKind::Like, &auth.handle, &event.tag);
        NotificationRepo::create(
            &state.pool,
            &NewNotification {
                user_id: event.owner_id,
                kind: NotificationKind::Like.as_str(),
                actor_id: auth.user_id,
                actor_handle: auth.handle.clone(),
                event_id: Some(event.id),
                event_tag: event.tag.clone(),
                message: message.clone(),
                image_data: event.image_data.clone(),
            },
        )
        .await?;

        state.event_bus.publish(
            SocialEvent::new(EVENT_LIKED)
                .with_event(event.id)
                .with_actor(auth.user_id)
                .with_recipients(vec![event.owner_id])
                .with_payload(serde_json::json!({ "message": message })),
        );
    }

    let like_count = LikeRepo::count(&state.pool, event.id).await?;
    Ok(Json(DataResponse {
        data: LikeResponse { liked, like_count },
    }))
}

/// `POST /events/{id}/comments`
pub async fn add_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(req): Json<CommentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Comment>>)> {
    let body = req.body.trim();
    if body.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Comment must not be empty".into(),
        )));
    }
    if body.len() > MAX_COMMENT_LEN {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Comment must be at most {MAX_COMMENT_LEN} characters"
        ))));
    }

    let event = visible_event(&state, &auth, id).await?;
    let comment = CommentRepo::add(&state.pool, event.id, auth.user_id, body).await?;

    if auth.user_id != event.owner_id {
        let message = render_message(NotificationKind::Comment, &auth.handle, &event.tag);
        NotificationRepo::create(
            &state.pool,
            &NewNotification {
                user_id: event.owner_id,
                kind: NotificationKind::Comment.as_str(),
                actor_id: auth.user_id,
                actor_handle: auth.handle.clone(),
                event_id: Some(event.id),
                event_tag: event.tag.clone(),
                message: message.clone(),
                image_data: event.image_data.clone(),
            },
        )
        .await?;

        state.event_bus.publish(
            SocialEvent::new(EVENT_COMMENTED)
                .with_event(event.id)
                .with_actor(auth.user_id)
                .with_recipients(vec![event.owner_id])
                .with_payload(serde_json::json!({ "message": message, "comment_id": comment.id })),
        );
    }

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// `GET /events/{id}/comments`
pub async fn list_comments(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Comment>>>> {
    let event = visible_event(&state, &auth, id).await?;
    let comments = CommentRepo::list_for_event(&state.pool, event.id).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// `POST /events/{id}/share`
///
/// Sends the event to each chosen recipient as a notification. Sharing
/// never mutates the event itself; the sharer is silently dropped from
/// their own recipient list.
pub async fn share_event(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(req): Json<ShareRequest>,
) -> AppResult<Json<DataResponse<ShareResponse>>> {
    if req.recipient_user_ids.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "At least one recipient is required".into(),
        )));
    }

    let event = visible_event(&state, &auth, id).await?;

    let known = UserRepo::filter_existing(&state.pool, &req.recipient_user_ids).await?;
    let unknown: Vec<String> = req
        .recipient_user_ids
        .iter()
        .filter(|id| !known.contains(id))
        .map(|id| id.to_string())
        .collect();
    if !unknown.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown recipient(s): {}",
            unknown.join(", ")
        ))));
    }

    let mut recipient_ids: Vec<DbId> = Vec::new();
    for &user_id in &req.recipient_user_ids {
        if user_id != auth.user_id && !recipient_ids.contains(&user_id) {
            recipient_ids.push(user_id);
        }
    }

    let message = render_message(NotificationKind::Share, &auth.handle, &event.tag);
    for &recipient_id in &recipient_ids {
        NotificationRepo::create(
            &state.pool,
            &NewNotification {
                user_id: recipient_id,
                kind: NotificationKind::Share.as_str(),
                actor_id: auth.user_id,
                actor_handle: auth.handle.clone(),
                event_id: Some(event.id),
                event_tag: event.tag.clone(),
                message: message.clone(),
                image_data: event.image_data.clone(),
            },
        )
        .await?;
    }

    if !recipient_ids.is_empty() {
        state.event_bus.publish(
            SocialEvent::new(EVENT_SHARED)
                .with_event(event.id)
                .with_actor(auth.user_id)
                .with_recipients(recipient_ids.clone())
                .with_payload(serde_json::json!({ "message": message })),
        );
    }

    Ok(Json(DataResponse {
        data: ShareResponse {
            shared_with: recipient_ids,
        },
    }))
}

/// Load an event the caller may interact with: the owner's own event, or
/// anyone's public event. Private events of others read as missing.
async fn visible_event(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<Event> {
    let event = EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "event", id }))?;
    if event.owner_id != auth.user_id && !event.is_public {
        return Err(AppError::Core(CoreError::NotFound { entity: "event", id }));
    }
    Ok(event)
}
