//! Event lifecycle: the private row, its public mirror, and visibility.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{build_test_app, create_event, delete, get, post_json, put_json, register_user};

/// Number of mirror rows for an event, read straight from the database.
async fn mirror_count(pool: &sqlx::PgPool, event_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM public_events WHERE event_id = $1")
        .bind(event_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn public_event_gets_a_mirror_row(pool: sqlx::PgPool) {
    let app = build_test_app(pool.clone());
    let (token, _) = register_user(&app, "jane@example.com").await;

    let event = create_event(&app, &token, "Concert", true).await;
    let id = event["id"].as_i64().unwrap();

    assert_eq!(event["tag"], "#Concert");
    assert_eq!(mirror_count(&pool, id).await, 1);

    // And it shows up in the public listing.
    let (status, body) = get(&app, "/api/v1/events", &token).await;
    assert_eq!(status, StatusCode::OK);
    let listing = body["data"].as_array().unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0]["event_id"].as_i64().unwrap(), id);
    assert_eq!(listing[0]["owner_handle"], "jane");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn private_event_has_no_mirror_and_hides_from_others(pool: sqlx::PgPool) {
    let app = build_test_app(pool.clone());
    let (owner, _) = register_user(&app, "jane@example.com").await;
    let (viewer, _) = register_user(&app, "omar@example.com").await;

    let event = create_event(&app, &owner, "Diary", false).await;
    let id = event["id"].as_i64().unwrap();

    assert_eq!(mirror_count(&pool, id).await, 0);

    // The owner can read their private copy.
    let (status, body) = get(&app, &format!("/api/v1/events/{id}"), &owner).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["event"]["is_public"], false);

    // Everyone else sees it as missing, not forbidden.
    let (status, _) = get(&app, &format!("/api/v1/events/{id}"), &viewer).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn visibility_flips_create_and_drop_the_mirror(pool: sqlx::PgPool) {
    let app = build_test_app(pool.clone());
    let (token, _) = register_user(&app, "jane@example.com").await;

    let event = create_event(&app, &token, "Picnic", false).await;
    let id = event["id"].as_i64().unwrap();
    assert_eq!(mirror_count(&pool, id).await, 0);

    let (status, _) = put_json(
        &app,
        &format!("/api/v1/events/{id}"),
        &token,
        json!({ "is_public": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mirror_count(&pool, id).await, 1);

    let (status, _) = put_json(
        &app,
        &format!("/api/v1/events/{id}"),
        &token,
        json!({ "is_public": false }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mirror_count(&pool, id).await, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn edits_rewrite_the_mirror(pool: sqlx::PgPool) {
    let app = build_test_app(pool.clone());
    let (token, _) = register_user(&app, "jane@example.com").await;

    let event = create_event(&app, &token, "Concert", true).await;
    let id = event["id"].as_i64().unwrap();

    let (status, body) = put_json(
        &app,
        &format!("/api/v1/events/{id}"),
        &token,
        json!({ "tag": "FarewellConcert", "location_name": "The Docks" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tag"], "#FarewellConcert");

    // The mirror carries the same fields.
    let mirror_tag: String = sqlx::query_scalar("SELECT tag FROM public_events WHERE event_id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(mirror_tag, "#FarewellConcert");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn edit_cannot_blank_the_location(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let (token, _) = register_user(&app, "jane@example.com").await;

    let event = create_event(&app, &token, "Concert", true).await;
    let id = event["id"].as_i64().unwrap();

    let (status, _) = put_json(
        &app,
        &format!("/api/v1/events/{id}"),
        &token,
        json!({ "location_name": "   " }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, detail) = get(&app, &format!("/api/v1/events/{id}"), &token).await;
    assert_eq!(detail["data"]["event"]["location_name"], "Town Hall");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_removes_both_copies(pool: sqlx::PgPool) {
    let app = build_test_app(pool.clone());
    let (token, _) = register_user(&app, "jane@example.com").await;

    let event = create_event(&app, &token, "Concert", true).await;
    let id = event["id"].as_i64().unwrap();

    let (status, _) = delete(&app, &format!("/api/v1/events/{id}"), &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    assert_eq!(mirror_count(&pool, id).await, 0);
    let (status, _) = get(&app, &format!("/api/v1/events/{id}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn only_the_owner_may_modify(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let (owner, _) = register_user(&app, "jane@example.com").await;
    let (other, _) = register_user(&app, "omar@example.com").await;

    let event = create_event(&app, &owner, "Concert", true).await;
    let id = event["id"].as_i64().unwrap();

    let (status, _) = put_json(
        &app,
        &format!("/api/v1/events/{id}"),
        &other,
        json!({ "description": "hijacked" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = delete(&app, &format!("/api/v1/events/{id}"), &other).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn tag_is_normalized_and_validated(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let (token, _) = register_user(&app, "jane@example.com").await;

    let event = create_event(&app, &token, "##Party", true).await;
    assert_eq!(event["tag"], "#Party");

    let (status, body) = post_json(
        &app,
        "/api/v1/events",
        &token,
        json!({
            "tag": "two words",
            "event_date": "2026-09-12",
            "event_time": "19:30:00",
            "location_name": "Town Hall",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn tagging_unknown_users_rejects_the_event(pool: sqlx::PgPool) {
    let app = build_test_app(pool.clone());
    let (token, _) = register_user(&app, "jane@example.com").await;
    register_user(&app, "omar@example.com").await;

    let (status, body) = post_json(
        &app,
        "/api/v1/events",
        &token,
        json!({
            "tag": "Party",
            "event_date": "2026-09-12",
            "event_time": "19:30:00",
            "location_name": "Town Hall",
            "tagged_handles": ["omar", "ghost"],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("ghost"));

    // Nothing was written.
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn tagged_users_appear_in_detail_and_profile(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let (jane, _) = register_user(&app, "jane@example.com").await;
    let (omar, omar_user) = register_user(&app, "omar@example.com").await;
    let omar_id = omar_user["id"].as_i64().unwrap();

    let (status, body) = post_json(
        &app,
        "/api/v1/events",
        &jane,
        json!({
            "tag": "Party",
            "event_date": "2026-09-12",
            "event_time": "19:30:00",
            "location_name": "Town Hall",
            "tagged_handles": ["omar"],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();

    let (_, detail) = get(&app, &format!("/api/v1/events/{id}"), &jane).await;
    assert_eq!(
        detail["data"]["tagged_user_ids"].as_array().unwrap(),
        &vec![json!(omar_id)]
    );

    // Tagged events surface on the tagged user's profile listing.
    let (status, tagged) = get(&app, "/api/v1/users/omar/tagged", &omar).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tagged["data"].as_array().unwrap().len(), 1);
    assert_eq!(tagged["data"][0]["event_id"].as_i64().unwrap(), id);
}
