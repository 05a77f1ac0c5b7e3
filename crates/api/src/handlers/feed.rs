//! The home feed.

use std::collections::HashSet;

use axum::extract::State;
use axum::Json;
use gatherly_core::feed::compose_feed;
use gatherly_core::types::DbId;
use gatherly_db::models::event::PublicEvent;
use gatherly_db::repositories::{EventRepo, FollowRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub events: Vec<PublicEvent>,
    /// Ids the viewer follows, so the client can render follow state
    /// without a second request.
    pub following_ids: Vec<DbId>,
}

/// `GET /feed`
///
/// Public events from followed users plus the viewer's own, newest first.
/// A viewer who follows no one sees the global public listing instead of
/// an empty screen.
pub async fn get_feed(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<FeedResponse>>> {
    let following_ids = FollowRepo::following_ids(&state.pool, auth.user_id).await?;
    let following: HashSet<DbId> = following_ids.iter().copied().collect();

    let public_events = EventRepo::list_public(&state.pool, state.config.feed_limit).await?;
    let events = compose_feed(auth.user_id, &following, &public_events);

    Ok(Json(DataResponse {
        data: FeedResponse {
            events,
            following_ids,
        },
    }))
}
