//! Registration, login, token refresh, and logout.
//!
//! Login failures are counted per account; after
//! [`MAX_FAILED_ATTEMPTS`] consecutive failures the account locks for
//! [`LOCK_DURATION_MINS`] minutes. Refresh tokens are single-use: a
//! successful refresh revokes the presented session and issues a new one.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Duration;
use gatherly_core::error::CoreError;
use gatherly_core::tags::{derive_handle, MAX_HANDLE_LEN};
use gatherly_core::types::DbId;
use gatherly_db::models::user::{CreateUser, User};
use gatherly_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Consecutive failed logins before an account locks.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// How long a locked account stays locked.
const LOCK_DURATION_MINS: i64 = 15;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    pub password: String,
    /// Defaults to the derived handle when omitted.
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

/// The authenticated user's own view of their account (includes email).
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: DbId,
    pub email: String,
    pub handle: String,
    pub display_name: String,
    pub image_data: Option<String>,
}

impl From<&User> for AccountResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            handle: user.handle.clone(),
            display_name: user.display_name.clone(),
            image_data: user.image_data.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in seconds.
    pub expires_in: i64,
    pub user: AccountResponse,
}

/// `POST /auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AuthResponse>>)> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    validate_password_strength(&req.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if UserRepo::find_by_email(&state.pool, &req.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "Email already registered".into(),
        )));
    }

    let handle = unique_handle(&state, &req.email).await?;
    let display_name = req.display_name.unwrap_or_else(|| handle.clone());

    let password_hash = hash_password(&req.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: req.email,
            handle,
            display_name,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, handle = %user.handle, "User registered");

    let response = issue_tokens(&state, &user).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    // A missing account and a wrong password produce the same error so the
    // endpoint cannot be used to probe which emails exist.
    let user = UserRepo::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid email or password".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    if let Some(locked_until) = user.locked_until {
        if locked_until > chrono::Utc::now() {
            return Err(AppError::Core(CoreError::Forbidden(format!(
                "Account is locked until {}",
                locked_until.to_rfc3339()
            ))));
        }
    }

    let password_ok = verify_password(&req.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;

    if !password_ok {
        UserRepo::increment_failed_login(&state.pool, user.id).await?;
        if user.failed_login_count + 1 >= MAX_FAILED_ATTEMPTS {
            let until = chrono::Utc::now() + Duration::minutes(LOCK_DURATION_MINS);
            UserRepo::lock_account(&state.pool, user.id, until).await?;
            tracing::warn!(user_id = user.id, "Account locked after repeated login failures");
        }
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;
    tracing::info!(user_id = user.id, handle = %user.handle, "User logged in");

    let response = issue_tokens(&state, &user).await?;
    Ok(Json(DataResponse { data: response }))
}

/// `POST /auth/refresh`
///
/// Rotates the session: the presented refresh token is revoked and a fresh
/// access/refresh pair is issued.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let hash = hash_refresh_token(&req.refresh_token);
    let session = SessionRepo::find_valid(&state.pool, &hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Account unavailable".into())))?;

    SessionRepo::revoke(&state.pool, session.id).await?;

    let response = issue_tokens(&state, &user).await?;
    Ok(Json(DataResponse { data: response }))
}

/// `POST /auth/logout`
pub async fn logout(
    State(state): State<AppState>,
    Json(req): Json<LogoutRequest>,
) -> AppResult<StatusCode> {
    let hash = hash_refresh_token(&req.refresh_token);
    if let Some(session) = SessionRepo::find_valid(&state.pool, &hash).await? {
        SessionRepo::revoke(&state.pool, session.id).await?;
        tracing::info!(user_id = session.user_id, "Session revoked");
    }
    // Unknown tokens are treated as already logged out.
    Ok(StatusCode::NO_CONTENT)
}

/// Derive a handle from the email and append a numeric suffix until it is
/// free.
async fn unique_handle(state: &AppState, email: &str) -> AppResult<String> {
    let base = derive_handle(email);
    if !UserRepo::handle_exists(&state.pool, &base).await? {
        return Ok(base);
    }

    let mut n: u32 = 2;
    loop {
        let suffix = n.to_string();
        let mut candidate = base.clone();
        candidate.truncate(MAX_HANDLE_LEN - suffix.len());
        candidate.push_str(&suffix);
        if !UserRepo::handle_exists(&state.pool, &candidate).await? {
            return Ok(candidate);
        }
        n += 1;
    }
}

/// Generate an access/refresh token pair and persist the session.
async fn issue_tokens(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let jwt = &state.config.jwt;

    let access_token = generate_access_token(user.id, &user.handle, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    let (refresh_token, refresh_hash) = generate_refresh_token();
    let expires_at = chrono::Utc::now() + Duration::days(jwt.refresh_token_expiry_days);
    SessionRepo::create(&state.pool, user.id, &refresh_hash, expires_at).await?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        expires_in: jwt.access_token_expiry_mins * 60,
        user: AccountResponse::from(user),
    })
}
