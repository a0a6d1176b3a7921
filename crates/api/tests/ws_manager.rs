//! Unit tests for `WsManager`.
//!
//! These tests exercise the WebSocket connection manager directly, without
//! performing any HTTP upgrades.

use axum::extract::ws::Message;
use gigline_api::ws::{ConnectionKind, WsManager};

#[tokio::test]
async fn new_manager_has_zero_connections() {
    let manager = WsManager::new();

    assert_eq!(manager.connection_count().await, 0);
}

#[tokio::test]
async fn add_and_remove_track_connection_count() {
    let manager = WsManager::new();

    let _rx = manager.add("conn-1".to_string(), "user-1").await;
    assert_eq!(manager.connection_count().await, 1);

    manager.remove("nonexistent").await;
    assert_eq!(manager.connection_count().await, 1);

    manager.remove("conn-1").await;
    assert_eq!(manager.connection_count().await, 0);
}

#[tokio::test]
async fn send_to_user_reaches_only_that_users_connections() {
    let manager = WsManager::new();

    let mut phone = manager.add("conn-1".to_string(), "user-1").await;
    let mut laptop = manager.add("conn-2".to_string(), "user-1").await;
    let mut other = manager.add("conn-3".to_string(), "user-2").await;

    let sent = manager
        .send_to_user("user-1", Message::Text("hello".into()))
        .await;

    assert_eq!(sent, 2);
    assert!(matches!(phone.try_recv(), Ok(Message::Text(t)) if t.as_str() == "hello"));
    assert!(matches!(laptop.try_recv(), Ok(Message::Text(t)) if t.as_str() == "hello"));
    assert!(other.try_recv().is_err());
}

#[tokio::test]
async fn send_to_user_skips_closed_receivers() {
    let manager = WsManager::new();

    let rx = manager.add("conn-1".to_string(), "user-1").await;
    drop(rx);

    let sent = manager
        .send_to_user("user-1", Message::Text("hello".into()))
        .await;
    assert_eq!(sent, 0);
}

#[tokio::test]
async fn send_to_user_skips_conversation_streams() {
    let manager = WsManager::new();

    let mut listener = manager.add("conn-1".to_string(), "user-1").await;
    let mut stream = manager
        .add_with_kind("conn-2".to_string(), "user-1", ConnectionKind::Conversation)
        .await;

    let sent = manager
        .send_to_user("user-1", Message::Text("hello".into()))
        .await;

    assert_eq!(sent, 1);
    assert!(matches!(listener.try_recv(), Ok(Message::Text(t)) if t.as_str() == "hello"));
    assert!(stream.try_recv().is_err());

    // Keep-alive still covers both.
    assert_eq!(manager.ping_all().await, 0);
    assert!(matches!(stream.try_recv(), Ok(Message::Ping(_))));
    assert_eq!(manager.user_connection_count("user-1").await, 2);
}

#[tokio::test]
async fn ping_all_sends_ping_to_every_connection() {
    let manager = WsManager::new();

    let mut rx1 = manager.add("conn-1".to_string(), "user-1").await;
    let mut rx2 = manager.add("conn-2".to_string(), "user-2").await;

    assert_eq!(manager.ping_all().await, 0);

    assert!(matches!(rx1.try_recv(), Ok(Message::Ping(_))));
    assert!(matches!(rx2.try_recv(), Ok(Message::Ping(_))));
}

#[tokio::test]
async fn ping_all_prunes_connections_with_closed_receivers() {
    let manager = WsManager::new();

    let _alive = manager.add("conn-1".to_string(), "user-1").await;
    let gone = manager.add("conn-2".to_string(), "user-1").await;
    drop(gone);

    assert_eq!(manager.ping_all().await, 1);
    assert_eq!(manager.connection_count().await, 1);
    assert_eq!(manager.user_connection_count("user-1").await, 1);
}

#[tokio::test]
async fn shutdown_all_sends_close_and_clears() {
    let manager = WsManager::new();

    let mut rx1 = manager.add("conn-1".to_string(), "user-1").await;
    let mut rx2 = manager.add("conn-2".to_string(), "user-2").await;

    manager.shutdown_all().await;

    assert_eq!(manager.connection_count().await, 0);
    assert!(matches!(rx1.recv().await, Some(Message::Close(None))));
    assert!(matches!(rx2.recv().await, Some(Message::Close(None))));
}
