//! Integration tests for the project conversation endpoints.

mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use common::{body_json, get, post_json, CLIENT_ID, FREELANCER_ID, PROJECT_ID};
use serde_json::json;

fn messages_uri() -> String {
    format!("/api/v1/projects/{PROJECT_ID}/messages")
}

#[tokio::test]
async fn send_message_returns_201_with_sequence_number() {
    let test = common::build_test_app().await;

    let response = post_json(
        test.app(),
        &messages_uri(),
        Some(CLIENT_ID),
        json!({ "recipientId": FREELANCER_ID, "content": "  Hi there  " }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["sequenceNumber"], 1);
    assert_eq!(json["data"]["senderId"], CLIENT_ID);
    assert_eq!(json["data"]["recipientId"], FREELANCER_ID);
    assert_eq!(json["data"]["content"], "Hi there");
}

#[tokio::test]
async fn send_message_notifies_the_recipient() {
    let test = common::build_test_app().await;

    post_json(
        test.app(),
        &messages_uri(),
        Some(CLIENT_ID),
        json!({ "recipientId": FREELANCER_ID, "content": "Draft is ready for review" }),
    )
    .await;

    let response = get(test.app(), "/api/v1/notifications", Some(FREELANCER_ID)).await;
    let json = body_json(response).await;
    let inbox = json["data"].as_array().unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0]["type"], "message");
    assert_eq!(inbox[0]["relatedId"], PROJECT_ID);
    assert_eq!(inbox[0]["read"], false);
    assert!(inbox[0]["message"]
        .as_str()
        .unwrap()
        .contains("Draft is ready for review"));
}

#[tokio::test]
async fn history_is_ascending_and_honours_after() {
    let test = common::build_test_app().await;
    for content in ["one", "two", "three"] {
        let response = post_json(
            test.app(),
            &messages_uri(),
            Some(CLIENT_ID),
            json!({ "recipientId": FREELANCER_ID, "content": content }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get(test.app(), &messages_uri(), Some(FREELANCER_ID)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let sequences: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["sequenceNumber"].as_i64().unwrap())
        .collect();
    assert_eq!(sequences, vec![1, 2, 3]);

    let uri = format!("{}?after=1&limit=1", messages_uri());
    let json = body_json(get(test.app(), &uri, Some(FREELANCER_ID)).await).await;
    let page = json["data"].as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["content"], "two");
}

#[tokio::test]
async fn blank_content_returns_400_and_stores_nothing() {
    let test = common::build_test_app().await;

    let response = post_json(
        test.app(),
        &messages_uri(),
        Some(CLIENT_ID),
        json!({ "recipientId": FREELANCER_ID, "content": "   " }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(test.store.message_count().await, 0);
    assert_eq!(test.store.notification_count().await, 0);
}

#[tokio::test]
async fn blank_recipient_returns_400_and_stores_nothing() {
    let test = common::build_test_app().await;

    let response = post_json(
        test.app(),
        &messages_uri(),
        Some(CLIENT_ID),
        json!({ "recipientId": "  ", "content": "hello" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_matches!(json["code"].as_str(), Some("VALIDATION_ERROR"));
    assert_matches!(json["error"].as_str(), Some(msg) if msg.contains("recipient_id"));
    assert_eq!(test.store.message_count().await, 0);
    assert_eq!(test.store.notification_count().await, 0);
}

#[tokio::test]
async fn unknown_project_returns_404() {
    let test = common::build_test_app().await;

    let response = post_json(
        test.app(),
        "/api/v1/projects/missing/messages",
        Some(CLIENT_ID),
        json!({ "recipientId": FREELANCER_ID, "content": "hello" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(test.store.message_count().await, 0);
}

#[tokio::test]
async fn storage_outage_returns_503() {
    let test = common::build_test_app().await;
    test.store.set_unavailable(true);

    let response = get(test.app(), &messages_uri(), Some(CLIENT_ID)).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "PERSISTENCE_ERROR");
}
