//! Notification listing and read-state management.
//!
//! Read-state changes push a `notification.count` frame to the user's
//! WebSocket connections so badges on other tabs stay exact without
//! polling.

use axum::extract::ws::Message;
use axum::extract::{Path, Query, State};
use axum::Json;
use gatherly_core::error::CoreError;
use gatherly_core::types::DbId;
use gatherly_db::models::notification::Notification;
use gatherly_db::repositories::NotificationRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default page size for the notification list.
const DEFAULT_LIMIT: i64 = 50;

/// Maximum page size for the notification list.
const MAX_LIMIT: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub notifications: Vec<Notification>,
    pub unread_count: i64,
}

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

#[derive(Debug, Serialize)]
pub struct MarkAllResponse {
    pub marked: u64,
}

/// `GET /notifications`
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<ListResponse>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let notifications = NotificationRepo::list_for_user(
        &state.pool,
        auth.user_id,
        params.unread_only,
        limit,
        offset,
    )
    .await?;
    let unread_count = NotificationRepo::unread_count(&state.pool, auth.user_id).await?;

    Ok(Json(DataResponse {
        data: ListResponse {
            notifications,
            unread_count,
        },
    }))
}

/// `GET /notifications/unread-count`
///
/// The exact badge number, recomputed from unread rows.
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UnreadCountResponse>>> {
    let unread_count = NotificationRepo::unread_count(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: UnreadCountResponse { unread_count },
    }))
}

/// `POST /notifications/{id}/read`
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UnreadCountResponse>>> {
    let updated = NotificationRepo::mark_read(&state.pool, id, auth.user_id).await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "notification",
            id,
        }));
    }

    let unread_count = NotificationRepo::unread_count(&state.pool, auth.user_id).await?;
    push_badge(&state, auth.user_id, unread_count).await;
    Ok(Json(DataResponse {
        data: UnreadCountResponse { unread_count },
    }))
}

/// `POST /notifications/read-all`
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MarkAllResponse>>> {
    let marked = NotificationRepo::mark_all_read(&state.pool, auth.user_id).await?;
    push_badge(&state, auth.user_id, 0).await;
    Ok(Json(DataResponse {
        data: MarkAllResponse { marked },
    }))
}

/// Push the fresh badge number to every connection the user has open.
async fn push_badge(state: &AppState, user_id: DbId, unread_count: i64) {
    let frame = serde_json::json!({
        "type": "notification.count",
        "unread_count": unread_count,
    });
    state
        .ws_manager
        .send_to_user(user_id, Message::Text(frame.to_string().into()))
        .await;
}
