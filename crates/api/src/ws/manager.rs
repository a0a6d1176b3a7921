use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::Message;
use gigline_core::types::{Timestamp, UserId};
use tokio::sync::{mpsc, RwLock};

/// Outbound frame queue of one socket.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// What a socket was opened to receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    /// `/ws/notifications`: receives notification pushes.
    Notifications,
    /// `/ws/conversations/{id}`: receives one conversation's messages only.
    Conversation,
}

/// One open socket and the user it was opened for.
pub struct WsConnection {
    pub user_id: UserId,
    pub kind: ConnectionKind,
    pub sender: WsSender,
    pub connected_at: Timestamp,
}

/// Registry of open sockets, keyed by connection id.
///
/// Shared as `Arc<WsManager>` between socket tasks, the notification push
/// task, the heartbeat and shutdown.
#[derive(Default)]
pub struct WsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
}

impl WsManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a notification socket for `user_id` and hand back its frame
    /// queue.
    pub async fn add(
        &self,
        conn_id: String,
        user_id: impl Into<UserId>,
    ) -> mpsc::UnboundedReceiver<Message> {
        self.add_with_kind(conn_id, user_id, ConnectionKind::Notifications)
            .await
    }

    /// Register a socket of the given kind. Conversation sockets still get
    /// keep-alive pings and the shutdown Close, but never notification
    /// pushes.
    pub async fn add_with_kind(
        &self,
        conn_id: String,
        user_id: impl Into<UserId>,
        kind: ConnectionKind,
    ) -> mpsc::UnboundedReceiver<Message> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.connections.write().await.insert(
            conn_id,
            WsConnection {
                user_id: user_id.into(),
                kind,
                sender,
                connected_at: chrono::Utc::now(),
            },
        );
        receiver
    }

    pub async fn remove(&self, conn_id: &str) {
        self.connections.write().await.remove(conn_id);
    }

    /// Queue `message` on every notification socket `user_id` has open.
    ///
    /// Returns how many sockets accepted it; closed queues are skipped.
    pub async fn send_to_user(&self, user_id: &str, message: Message) -> usize {
        self.connections
            .read()
            .await
            .values()
            .filter(|conn| conn.kind == ConnectionKind::Notifications && conn.user_id == user_id)
            .filter(|conn| conn.sender.send(message.clone()).is_ok())
            .count()
    }

    /// Sockets currently open for `user_id`.
    pub async fn user_connection_count(&self, user_id: &str) -> usize {
        self.connections
            .read()
            .await
            .values()
            .filter(|conn| conn.user_id == user_id)
            .count()
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Queue a Ping on every socket and forget those whose queue is closed.
    ///
    /// Returns the number of connections removed.
    pub async fn ping_all(&self) -> usize {
        let mut conns = self.connections.write().await;
        let before = conns.len();
        conns.retain(|_, conn| conn.sender.send(Message::Ping(Bytes::new())).is_ok());
        before - conns.len()
    }

    /// Queue a Close on every socket and empty the registry.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        tracing::info!(count = conns.len(), "Closing WebSocket connections");
        conns.clear();
    }
}
