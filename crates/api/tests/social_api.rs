//! Likes, comments, and shares, including their notification fan-out.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{build_test_app, create_event, get, post_json, register_user};

#[sqlx::test(migrations = "../db/migrations")]
async fn like_is_a_pure_toggle(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let (jane, _) = register_user(&app, "jane@example.com").await;
    let (omar, _) = register_user(&app, "omar@example.com").await;

    let event = create_event(&app, &jane, "Concert", true).await;
    let uri = format!("/api/v1/events/{}/like", event["id"]);

    let (status, body) = post_json(&app, &uri, &omar, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["liked"], true);
    assert_eq!(body["data"]["like_count"], 1);

    // Toggling again restores the original state.
    let (_, body) = post_json(&app, &uri, &omar, json!({})).await;
    assert_eq!(body["data"]["liked"], false);
    assert_eq!(body["data"]["like_count"], 0);

    let (_, body) = post_json(&app, &uri, &omar, json!({})).await;
    assert_eq!(body["data"]["liked"], true);
    assert_eq!(body["data"]["like_count"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn fresh_like_notifies_the_owner_once(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let (jane, _) = register_user(&app, "jane@example.com").await;
    let (omar, _) = register_user(&app, "omar@example.com").await;

    let event = create_event(&app, &jane, "Concert", true).await;
    let uri = format!("/api/v1/events/{}/like", event["id"]);

    // Like, unlike, like again: two fresh likes, two notifications.
    post_json(&app, &uri, &omar, json!({})).await;
    post_json(&app, &uri, &omar, json!({})).await;
    post_json(&app, &uri, &omar, json!({})).await;

    let (status, body) = get(&app, "/api/v1/notifications", &jane).await;
    assert_eq!(status, StatusCode::OK);
    let notifications = body["data"]["notifications"].as_array().unwrap();
    assert_eq!(notifications.len(), 2);
    assert_eq!(notifications[0]["kind"], "like");
    assert_eq!(
        notifications[0]["message"],
        "@omar liked your event #Concert"
    );
    assert_eq!(body["data"]["unread_count"], 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn liking_your_own_event_never_notifies(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let (jane, _) = register_user(&app, "jane@example.com").await;

    let event = create_event(&app, &jane, "Concert", true).await;
    let uri = format!("/api/v1/events/{}/like", event["id"]);

    let (status, body) = post_json(&app, &uri, &jane, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["liked"], true);

    let (_, body) = get(&app, "/api/v1/notifications/unread-count", &jane).await;
    assert_eq!(body["data"]["unread_count"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn comments_append_and_bump_the_count(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let (jane, _) = register_user(&app, "jane@example.com").await;
    let (omar, _) = register_user(&app, "omar@example.com").await;

    let event = create_event(&app, &jane, "Concert", true).await;
    let id = event["id"].as_i64().unwrap();
    let uri = format!("/api/v1/events/{id}/comments");

    let (status, body) = post_json(&app, &uri, &omar, json!({ "body": "see you there" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["author_handle"], "omar");

    post_json(&app, &uri, &jane, json!({ "body": "doors at 7" })).await;

    // Oldest first, and the denormalized count tracks exactly.
    let (_, detail) = get(&app, &format!("/api/v1/events/{id}"), &jane).await;
    let comments = detail["data"]["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["body"], "see you there");
    assert_eq!(comments[1]["body"], "doors at 7");
    assert_eq!(detail["data"]["event"]["comment_count"], 2);

    // Only the non-owner comment produced a notification.
    let (_, body) = get(&app, "/api/v1/notifications", &jane).await;
    let notifications = body["data"]["notifications"].as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["kind"], "comment");
    assert_eq!(
        notifications[0]["message"],
        "@omar commented on your event #Concert"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn empty_comment_rejected(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let (jane, _) = register_user(&app, "jane@example.com").await;
    let event = create_event(&app, &jane, "Concert", true).await;

    let (status, _) = post_json(
        &app,
        &format!("/api/v1/events/{}/comments", event["id"]),
        &jane,
        json!({ "body": "   " }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn share_fans_out_one_notification_per_recipient(pool: sqlx::PgPool) {
    let app = build_test_app(pool.clone());
    let (jane, jane_user) = register_user(&app, "jane@example.com").await;
    let (omar, omar_user) = register_user(&app, "omar@example.com").await;
    let (lena, lena_user) = register_user(&app, "lena@example.com").await;

    let event = create_event(&app, &jane, "Concert", true).await;
    let id = event["id"].as_i64().unwrap();

    // The sharer in their own recipient list is silently dropped.
    let (status, body) = post_json(
        &app,
        &format!("/api/v1/events/{id}/share"),
        &jane,
        json!({ "recipient_user_ids": [omar_user["id"], lena_user["id"], jane_user["id"]] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let shared_with = body["data"]["shared_with"].as_array().unwrap();
    assert_eq!(shared_with.len(), 2);
    assert!(shared_with.contains(&omar_user["id"]));
    assert!(shared_with.contains(&lena_user["id"]));

    for token in [&omar, &lena] {
        let (_, body) = get(&app, "/api/v1/notifications", token).await;
        let notifications = body["data"]["notifications"].as_array().unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0]["kind"], "share");
        assert_eq!(
            notifications[0]["message"],
            "@jane shared the event #Concert with you"
        );
    }

    // Sharing never mutates the event.
    let comment_count: i32 =
        sqlx::query_scalar("SELECT comment_count FROM events WHERE id = $1")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(comment_count, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn share_with_unknown_recipient_rejects(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let (jane, _) = register_user(&app, "jane@example.com").await;
    let event = create_event(&app, &jane, "Concert", true).await;

    let (status, body) = post_json(
        &app,
        &format!("/api/v1/events/{}/share", event["id"]),
        &jane,
        json!({ "recipient_user_ids": [999_999] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("999999"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn private_events_of_others_cannot_be_interacted_with(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let (jane, _) = register_user(&app, "jane@example.com").await;
    let (omar, _) = register_user(&app, "omar@example.com").await;

    let event = create_event(&app, &jane, "Diary", false).await;
    let id = event["id"].as_i64().unwrap();

    let (status, _) = post_json(&app, &format!("/api/v1/events/{id}/like"), &omar, json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post_json(
        &app,
        &format!("/api/v1/events/{id}/comments"),
        &omar,
        json!({ "body": "hello?" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
