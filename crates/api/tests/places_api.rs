//! Places endpoints with no upstream configured.
//!
//! The test configuration sets no API key, so both endpoints must answer
//! 502 with the standard error envelope instead of hanging or panicking.

mod common;

use axum::http::StatusCode;

use common::{build_test_app, get, register_user};

#[sqlx::test(migrations = "../db/migrations")]
async fn autocomplete_without_a_key_is_bad_gateway(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let (token, _) = register_user(&app, "jane@example.com").await;

    let (status, body) = get(&app, "/api/v1/places/autocomplete?q=Town", &token).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "UPSTREAM_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn blank_autocomplete_short_circuits_without_upstream(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let (token, _) = register_user(&app, "jane@example.com").await;

    // An empty query never reaches the provider, configured or not.
    let (status, body) = get(&app, "/api/v1/places/autocomplete?q=&seq=7", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["candidates"].as_array().unwrap().len(), 0);
    assert_eq!(body["data"]["seq"], 7);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn resolve_without_a_key_is_bad_gateway(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let (token, _) = register_user(&app, "jane@example.com").await;

    let (status, body) = get(&app, "/api/v1/places/some-place-id", &token).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "UPSTREAM_ERROR");
}
