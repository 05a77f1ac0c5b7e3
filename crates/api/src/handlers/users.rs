//! Profiles, profile settings, and follow edges.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use gatherly_core::error::CoreError;
use gatherly_core::image::{decode_upload, process_upload, AVATAR_BOUNDS};
use gatherly_core::tags::validate_handle;
use gatherly_core::types::DbId;
use gatherly_db::models::user::{UpdateProfile, User, UserSummary};
use gatherly_db::repositories::{EventRepo, FollowRepo, UserRepo};
use gatherly_events::bus::USER_FOLLOWED;
use gatherly_events::SocialEvent;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A profile as seen by another (or the same) user.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserSummary,
    pub follower_count: usize,
    pub following_count: usize,
    pub follower_ids: Vec<DbId>,
    pub following_ids: Vec<DbId>,
    /// Whether the viewer currently follows this profile. Always `false`
    /// for the viewer's own profile.
    pub is_following: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateMeRequest {
    pub display_name: Option<String>,
    pub handle: Option<String>,
    /// Base64 (or data-URL) image upload; scaled and re-encoded before
    /// storage.
    pub image_upload: Option<String>,
    /// Pasted external image URL; stored verbatim, never fetched.
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FollowResponse {
    pub following: bool,
    pub follower_count: usize,
}

/// `GET /users/{handle}`
pub async fn get_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> AppResult<Json<DataResponse<ProfileResponse>>> {
    let user = find_by_handle(&state, &handle).await?;

    let follower_ids = FollowRepo::follower_ids(&state.pool, user.id).await?;
    let following_ids = FollowRepo::following_ids(&state.pool, user.id).await?;
    let is_following = user.id != auth.user_id && follower_ids.contains(&auth.user_id);

    Ok(Json(DataResponse {
        data: ProfileResponse {
            user: summary(&user),
            follower_count: follower_ids.len(),
            following_count: following_ids.len(),
            follower_ids,
            following_ids,
            is_following,
        },
    }))
}

/// `PUT /users/me`
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateMeRequest>,
) -> AppResult<Json<DataResponse<UserSummary>>> {
    if let Some(handle) = &req.handle {
        validate_handle(handle).map_err(AppError::Core)?;
        if handle != &auth.handle && UserRepo::handle_exists(&state.pool, handle).await? {
            return Err(AppError::Core(CoreError::Conflict(
                "Handle already taken".into(),
            )));
        }
    }

    if let Some(name) = &req.display_name {
        if name.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "Display name must not be empty".into(),
            )));
        }
    }

    let image_data = match (&req.image_upload, &req.image_url) {
        (Some(upload), _) => {
            let bytes = decode_upload(upload).map_err(AppError::Core)?;
            Some(process_upload(&bytes, AVATAR_BOUNDS).map_err(AppError::Core)?)
        }
        (None, Some(url)) => Some(url.clone()),
        (None, None) => None,
    };

    let input = UpdateProfile {
        display_name: req.display_name,
        handle: req.handle,
        image_data,
    };

    let user = UserRepo::update_profile(&state.pool, auth.user_id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound {
            entity: "user",
            id: auth.user_id,
        }))?;

    Ok(Json(DataResponse {
        data: summary(&user),
    }))
}

/// `POST /users/{handle}/follow`
pub async fn follow(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> AppResult<Json<DataResponse<FollowResponse>>> {
    let target = find_by_handle(&state, &handle).await?;

    // Rejected before any write; the CHECK constraint is only a backstop.
    if target.id == auth.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot follow yourself".into(),
        )));
    }

    let created = FollowRepo::follow(&state.pool, auth.user_id, target.id).await?;
    if created {
        state.event_bus.publish(
            SocialEvent::new(USER_FOLLOWED)
                .with_actor(auth.user_id)
                .with_recipients(vec![target.id])
                .with_payload(serde_json::json!({ "follower_handle": auth.handle })),
        );
    }

    let follower_count = FollowRepo::follower_ids(&state.pool, target.id).await?.len();
    Ok(Json(DataResponse {
        data: FollowResponse {
            following: true,
            follower_count,
        },
    }))
}

/// `DELETE /users/{handle}/follow`
pub async fn unfollow(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> AppResult<Json<DataResponse<FollowResponse>>> {
    let target = find_by_handle(&state, &handle).await?;

    FollowRepo::unfollow(&state.pool, auth.user_id, target.id).await?;

    let follower_count = FollowRepo::follower_ids(&state.pool, target.id).await?.len();
    Ok(Json(DataResponse {
        data: FollowResponse {
            following: false,
            follower_count,
        },
    }))
}

/// `GET /users/{handle}/events`
///
/// The owner sees all of their events, private included; everyone else
/// sees only the public mirror.
pub async fn list_events(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let target = find_by_handle(&state, &handle).await?;

    let data = if target.id == auth.user_id {
        let events = EventRepo::list_owned(&state.pool, target.id).await?;
        to_json(events)?
    } else {
        let events = EventRepo::list_public_by_owner(&state.pool, target.id).await?;
        to_json(events)?
    };

    Ok(Json(DataResponse { data }))
}

/// `GET /users/{handle}/tagged`
pub async fn list_tagged_events(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let target = find_by_handle(&state, &handle).await?;
    let events = EventRepo::list_tagged(&state.pool, target.id).await?;
    Ok(Json(DataResponse {
        data: to_json(events)?,
    }))
}

/// `DELETE /users/me/sessions`
///
/// Sign out everywhere: revoke every live refresh-token session.
pub async fn revoke_all_sessions(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<StatusCode> {
    let revoked =
        gatherly_db::repositories::SessionRepo::revoke_all_for_user(&state.pool, auth.user_id)
            .await?;
    tracing::info!(user_id = auth.user_id, revoked, "Revoked all sessions");
    Ok(StatusCode::NO_CONTENT)
}

async fn find_by_handle(state: &AppState, handle: &str) -> AppResult<User> {
    UserRepo::find_by_handle(&state.pool, handle)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| AppError::NotFound(format!("No user with handle '{handle}'")))
}

fn summary(user: &User) -> UserSummary {
    UserSummary {
        id: user.id,
        handle: user.handle.clone(),
        display_name: user.display_name.clone(),
        image_data: user.image_data.clone(),
    }
}

fn to_json<T: serde::Serialize>(value: T) -> AppResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| AppError::InternalError(e.to_string()))
}
