//! Integration tests for the notification inbox endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post, post_json, TestApp, CLIENT_ID, FREELANCER_ID, PROJECT_ID};
use serde_json::json;

/// Raise `count` application events, each notifying the client.
async fn seed_applications(test: &TestApp, count: usize) {
    for i in 0..count {
        let response = post_json(
            test.app(),
            "/api/v1/events",
            Some(FREELANCER_ID),
            json!({
                "type": "application",
                "projectId": PROJECT_ID,
                "message": format!("Application {i}"),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}

async fn unread(test: &TestApp, user: &str) -> i64 {
    let json = body_json(get(test.app(), "/api/v1/notifications/unread-count", Some(user)).await).await;
    json["data"]["count"].as_i64().unwrap()
}

#[tokio::test]
async fn list_is_newest_first_and_scoped_to_the_caller() {
    let test = common::build_test_app().await;
    seed_applications(&test, 3).await;

    let json = body_json(get(test.app(), "/api/v1/notifications", Some(CLIENT_ID)).await).await;
    let messages: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["message"].as_str().unwrap())
        .collect();
    assert_eq!(messages, vec!["Application 2", "Application 1", "Application 0"]);

    let json =
        body_json(get(test.app(), "/api/v1/notifications", Some(FREELANCER_ID)).await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn limit_and_offset_page_the_inbox() {
    let test = common::build_test_app().await;
    seed_applications(&test, 3).await;

    let json = body_json(
        get(
            test.app(),
            "/api/v1/notifications?limit=1&offset=1",
            Some(CLIENT_ID),
        )
        .await,
    )
    .await;
    let page = json["data"].as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["message"], "Application 1");
}

#[tokio::test]
async fn mark_read_updates_unread_count() {
    let test = common::build_test_app().await;
    seed_applications(&test, 2).await;
    assert_eq!(unread(&test, CLIENT_ID).await, 2);

    let json = body_json(get(test.app(), "/api/v1/notifications", Some(CLIENT_ID)).await).await;
    let id = json["data"][0]["id"].as_str().unwrap().to_string();

    let response = post(
        test.app(),
        &format!("/api/v1/notifications/{id}/read"),
        Some(CLIENT_ID),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(unread(&test, CLIENT_ID).await, 1);

    let json = body_json(
        get(
            test.app(),
            "/api/v1/notifications?unread_only=true",
            Some(CLIENT_ID),
        )
        .await,
    )
    .await;
    let remaining = json["data"].as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_ne!(remaining[0]["id"], id.as_str());
}

#[tokio::test]
async fn mark_read_of_another_users_notification_returns_404() {
    let test = common::build_test_app().await;
    seed_applications(&test, 1).await;

    let json = body_json(get(test.app(), "/api/v1/notifications", Some(CLIENT_ID)).await).await;
    let id = json["data"][0]["id"].as_str().unwrap().to_string();

    let response = post(
        test.app(),
        &format!("/api/v1/notifications/{id}/read"),
        Some(FREELANCER_ID),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(unread(&test, CLIENT_ID).await, 1);
}

#[tokio::test]
async fn read_all_marks_every_notification() {
    let test = common::build_test_app().await;
    seed_applications(&test, 3).await;

    let response = post(test.app(), "/api/v1/notifications/read-all", Some(CLIENT_ID)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["marked_read"], 3);
    assert_eq!(unread(&test, CLIENT_ID).await, 0);
}
