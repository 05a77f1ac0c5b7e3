//! Follow edges and profile views.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{build_test_app, create_event, delete, get, post_json, put_json, register_user};

#[sqlx::test(migrations = "../db/migrations")]
async fn follow_and_unfollow_round_trip(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let (jane, _) = register_user(&app, "jane@example.com").await;
    register_user(&app, "omar@example.com").await;

    let (status, body) = post_json(&app, "/api/v1/users/omar/follow", &jane, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["following"], true);
    assert_eq!(body["data"]["follower_count"], 1);

    // Following twice is a no-op, not an error.
    let (status, body) = post_json(&app, "/api/v1/users/omar/follow", &jane, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["follower_count"], 1);

    let (status, body) = delete(&app, "/api/v1/users/omar/follow", &jane).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["following"], false);
    assert_eq!(body["data"]["follower_count"], 0);

    // Unfollowing again is also a no-op.
    let (status, _) = delete(&app, "/api/v1/users/omar/follow", &jane).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn self_follow_is_rejected_before_any_write(pool: sqlx::PgPool) {
    let app = build_test_app(pool.clone());
    let (jane, _) = register_user(&app, "jane@example.com").await;

    let (status, _) = post_json(&app, "/api/v1/users/jane/follow", &jane, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn profile_reports_counts_and_viewer_state(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let (jane, jane_user) = register_user(&app, "jane@example.com").await;
    let (omar, _) = register_user(&app, "omar@example.com").await;
    let (lena, _) = register_user(&app, "lena@example.com").await;

    post_json(&app, "/api/v1/users/jane/follow", &omar, json!({})).await;
    post_json(&app, "/api/v1/users/jane/follow", &lena, json!({})).await;
    post_json(&app, "/api/v1/users/omar/follow", &jane, json!({})).await;

    let (status, body) = get(&app, "/api/v1/users/jane", &omar).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["id"], jane_user["id"]);
    assert_eq!(body["data"]["follower_count"], 2);
    assert_eq!(body["data"]["following_count"], 1);
    assert_eq!(body["data"]["is_following"], true);

    // The viewer's own profile is never "followed by themselves".
    let (_, body) = get(&app, "/api/v1/users/jane", &jane).await;
    assert_eq!(body["data"]["is_following"], false);

    let (status, _) = get(&app, "/api/v1/users/ghost", &jane).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn profile_event_listing_respects_visibility(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let (jane, _) = register_user(&app, "jane@example.com").await;
    let (omar, _) = register_user(&app, "omar@example.com").await;

    create_event(&app, &jane, "Concert", true).await;
    create_event(&app, &jane, "Diary", false).await;

    // The owner sees both rows, private included.
    let (_, body) = get(&app, "/api/v1/users/jane/events", &jane).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // Everyone else sees only the public mirror.
    let (_, body) = get(&app, "/api/v1/users/jane/events", &omar).await;
    let listing = body["data"].as_array().unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0]["tag"], "#Concert");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn profile_settings_update_handle_and_name(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let (jane, _) = register_user(&app, "jane@example.com").await;
    register_user(&app, "omar@example.com").await;

    let (status, body) = put_json(
        &app,
        "/api/v1/users/me",
        &jane,
        json!({ "display_name": "Jane D.", "handle": "janed" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["handle"], "janed");
    assert_eq!(body["data"]["display_name"], "Jane D.");

    // Taken handles conflict; invalid ones fail validation.
    let (status, _) = put_json(&app, "/api/v1/users/me", &jane, json!({ "handle": "omar" })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = put_json(
        &app,
        "/api/v1/users/me",
        &jane,
        json!({ "handle": "Not Valid" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
