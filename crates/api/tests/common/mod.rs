//! Shared helpers for API integration tests.
//!
//! Tests build the real application router against a per-test database
//! (provided by `#[sqlx::test]`) and drive it with `tower::ServiceExt`.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use gatherly_api::auth::jwt::JwtConfig;
use gatherly_api::config::{PlacesConfig, ServerConfig};
use gatherly_api::places::PlacesClient;
use gatherly_api::router::build_app_router;
use gatherly_api::state::AppState;
use gatherly_api::ws::WsManager;
use gatherly_events::EventBus;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Deterministic test configuration; no environment variables involved.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 5,
        feed_limit: 200,
        jwt: JwtConfig {
            secret: "integration-test-secret-that-is-long-enough".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        places: PlacesConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            // No key: the places endpoints answer 502 in tests.
            api_key: None,
        },
    }
}

/// Build the full application (router + middleware) over the given pool.
pub fn build_test_app(pool: sqlx::PgPool) -> Router {
    let config = Arc::new(test_config());
    let state = AppState {
        pool,
        config: Arc::clone(&config),
        ws_manager: Arc::new(WsManager::new()),
        event_bus: Arc::new(EventBus::default()),
        places: PlacesClient::new(config.places.clone()),
    };
    build_app_router(state)
}

/// Send one request and decode the JSON body (or `Null` when empty).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: &Router, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json(app: &Router, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Register a user, returning `(access_token, account_json)`.
///
/// The handle is derived from the email local part, so `jane@example.com`
/// registers as `@jane`.
pub async fn register_user(app: &Router, email: &str) -> (String, Value) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "email": email,
            "password": "correct-horse-battery",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

    let token = body["data"]["access_token"].as_str().unwrap().to_string();
    let user = body["data"]["user"].clone();
    (token, user)
}

/// Create an event with sensible defaults, returning its JSON row.
pub async fn create_event(app: &Router, token: &str, tag: &str, is_public: bool) -> Value {
    let (status, body) = post_json(
        app,
        "/api/v1/events",
        token,
        json!({
            "tag": tag,
            "description": "an event",
            "event_date": "2026-09-12",
            "event_time": "19:30:00",
            "location_name": "Town Hall",
            "is_public": is_public,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create event failed: {body}");
    body["data"].clone()
}
