//! Event-bus observer that pushes notifications over WebSocket.

use std::sync::Arc;

use axum::extract::ws::Message;
use gigline_events::RoutedEvent;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::ws::WsManager;

/// Forwards routed notifications to connected recipients.
///
/// Pushing is best-effort: the notification is already persisted when it
/// reaches this task, so a recipient without an open socket simply reads
/// it from the inbox later.
pub struct NotificationPush {
    ws_manager: Arc<WsManager>,
}

impl NotificationPush {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the push loop until the bus closes or `cancel` fires.
    pub async fn run(
        self,
        mut receiver: broadcast::Receiver<RoutedEvent>,
        cancel: CancellationToken,
    ) {
        loop {
            let received = tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Notification push stopped");
                    break;
                }
                received = receiver.recv() => received,
            };

            match received {
                Ok(routed) => {
                    self.push(&routed).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification push lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification push shutting down");
                    break;
                }
            }
        }
    }

    /// Send one notification frame to every connection of its recipient.
    ///
    /// Returns the number of connections reached.
    pub async fn push(&self, routed: &RoutedEvent) -> usize {
        let notification = &routed.notification;
        let payload = serde_json::json!({
            "type": "notification",
            "data": notification,
        });

        let delivered = self
            .ws_manager
            .send_to_user(
                &notification.user_id,
                Message::Text(payload.to_string().into()),
            )
            .await;

        tracing::debug!(
            notification_id = %notification.id,
            user_id = %notification.user_id,
            connections = delivered,
            "Notification pushed"
        );
        delivered
    }
}
