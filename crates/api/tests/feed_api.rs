//! Home feed composition over HTTP.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{build_test_app, create_event, get, post_json, register_user};

fn tags(body: &Value) -> Vec<String> {
    body["data"]["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["tag"].as_str().unwrap().to_string())
        .collect()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn feed_shows_followed_users_and_self(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let (jane, _) = register_user(&app, "jane@example.com").await;
    let (omar, _) = register_user(&app, "omar@example.com").await;
    let (lena, _) = register_user(&app, "lena@example.com").await;

    create_event(&app, &omar, "Followed", true).await;
    create_event(&app, &lena, "Stranger", true).await;
    create_event(&app, &jane, "Mine", true).await;

    post_json(&app, "/api/v1/users/omar/follow", &jane, json!({})).await;

    let (status, body) = get(&app, "/api/v1/feed", &jane).await;
    assert_eq!(status, StatusCode::OK);

    let feed_tags = tags(&body);
    assert!(feed_tags.contains(&"#Followed".to_string()));
    assert!(feed_tags.contains(&"#Mine".to_string()));
    assert!(!feed_tags.contains(&"#Stranger".to_string()));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn feed_falls_back_to_everything_when_following_nobody(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let (jane, _) = register_user(&app, "jane@example.com").await;
    let (omar, _) = register_user(&app, "omar@example.com").await;

    create_event(&app, &omar, "Discover", true).await;

    // Following nobody and having posted nothing: show the world, not an
    // empty screen.
    let (status, body) = get(&app, "/api/v1/feed", &jane).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tags(&body), vec!["#Discover"]);
    assert_eq!(body["data"]["following_ids"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn feed_never_contains_private_events(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let (jane, _) = register_user(&app, "jane@example.com").await;
    let (omar, _) = register_user(&app, "omar@example.com").await;

    post_json(&app, "/api/v1/users/omar/follow", &jane, json!({})).await;
    create_event(&app, &omar, "Public", true).await;
    create_event(&app, &omar, "Secret", false).await;

    let (_, body) = get(&app, "/api/v1/feed", &jane).await;
    assert_eq!(tags(&body), vec!["#Public"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn feed_is_newest_first(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let (jane, _) = register_user(&app, "jane@example.com").await;

    create_event(&app, &jane, "First", true).await;
    create_event(&app, &jane, "Second", true).await;
    create_event(&app, &jane, "Third", true).await;

    let (_, body) = get(&app, "/api/v1/feed", &jane).await;
    assert_eq!(tags(&body), vec!["#Third", "#Second", "#First"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unfollowing_removes_their_events_from_the_feed(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let (jane, _) = register_user(&app, "jane@example.com").await;
    let (omar, _) = register_user(&app, "omar@example.com").await;
    let (lena, _) = register_user(&app, "lena@example.com").await;

    create_event(&app, &omar, "FromOmar", true).await;
    create_event(&app, &lena, "FromLena", true).await;

    post_json(&app, "/api/v1/users/omar/follow", &jane, json!({})).await;
    post_json(&app, "/api/v1/users/lena/follow", &jane, json!({})).await;

    let (_, body) = get(&app, "/api/v1/feed", &jane).await;
    assert_eq!(tags(&body).len(), 2);

    common::delete(&app, "/api/v1/users/omar/follow", &jane).await;

    let (_, body) = get(&app, "/api/v1/feed", &jane).await;
    assert_eq!(tags(&body), vec!["#FromLena"]);
}
