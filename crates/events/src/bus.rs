//! Domain event ingestion point.
//!
//! [`EventBus::publish`] hands every [`DomainEvent`] to the
//! [`NotificationRouter`] and only returns once the resulting notification is
//! persisted. Routed events are then fanned out on a
//! `tokio::sync::broadcast` channel to observers such as the WebSocket push
//! service. The bus is designed to be shared via `Arc<EventBus>`.

use chrono::Utc;
use gigline_core::error::CoreError;
use gigline_core::types::{ProjectId, Timestamp, UserId};
use gigline_core::NotificationKind;
use gigline_db::models::notification::Notification;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::router::NotificationRouter;

// ---------------------------------------------------------------------------
// DomainEvent
// ---------------------------------------------------------------------------

/// Something that happened on a project and may concern one of its users.
///
/// Wire shape: `{ "type", "projectId", "message", "recipientId"?, "actorId"? }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainEvent {
    #[serde(rename = "type")]
    pub kind: NotificationKind,

    pub project_id: ProjectId,

    /// Human-readable text carried into the notification body.
    pub message: String,

    /// Explicit recipient. Required for `message` and `payment` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<UserId>,

    /// User that caused the event, used to pick the counterpart of a
    /// `project_update`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<UserId>,

    #[serde(default = "Utc::now")]
    pub occurred_at: Timestamp,
}

impl DomainEvent {
    /// Create an event with no explicit recipient or actor.
    pub fn new(
        kind: NotificationKind,
        project_id: impl Into<ProjectId>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            project_id: project_id.into(),
            message: message.into(),
            recipient_id: None,
            actor_id: None,
            occurred_at: Utc::now(),
        }
    }

    /// Attach an explicit recipient.
    pub fn with_recipient(mut self, user_id: impl Into<UserId>) -> Self {
        self.recipient_id = Some(user_id.into());
        self
    }

    /// Attach the acting user.
    pub fn with_actor(mut self, user_id: impl Into<UserId>) -> Self {
        self.actor_id = Some(user_id.into());
        self
    }
}

/// A published event together with the notification it produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutedEvent {
    pub event: DomainEvent,
    pub notification: Notification,
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the observer broadcast channel.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Routes published events and fans the results out to observers.
pub struct EventBus {
    router: NotificationRouter,
    sender: broadcast::Sender<RoutedEvent>,
}

impl EventBus {
    /// Create a bus with a specific observer channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed entries are dropped
    /// and slow observers will see `RecvError::Lagged`. Routing and
    /// persistence are unaffected.
    pub fn new(router: NotificationRouter, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { router, sender }
    }

    /// Create a bus with [`DEFAULT_CAPACITY`].
    pub fn with_router(router: NotificationRouter) -> Self {
        Self::new(router, DEFAULT_CAPACITY)
    }

    /// Route an event to its recipient and persist the notification.
    ///
    /// Returns once the notification row is durable. Email delivery is
    /// queued and never awaited here. Routing errors are returned to the
    /// caller and nothing is broadcast for them.
    pub async fn publish(&self, event: DomainEvent) -> Result<Notification, CoreError> {
        let notification = self.router.route(&event).await?;

        // Ignore the SendError: it only means there are no observers.
        let _ = self.sender.send(RoutedEvent {
            event,
            notification: notification.clone(),
        });

        Ok(notification)
    }

    /// Observe every successfully routed event.
    pub fn subscribe(&self) -> broadcast::Receiver<RoutedEvent> {
        self.sender.subscribe()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use gigline_db::models::project::Project;
    use gigline_db::MemoryStore;

    use super::*;
    use crate::delivery::DeliveryRelay;

    async fn bus_with_project() -> (EventBus, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        store
            .put_project(Project {
                id: "proj-1".into(),
                title: "Website".into(),
                client_id: Some("c1".into()),
                freelancer_id: Some("f1".into()),
            })
            .await;
        // The queue half is dropped: relay attempts are discarded.
        let (relay, _queue) = DeliveryRelay::channel();
        let router = NotificationRouter::new(store.clone(), store.clone(), relay);
        (EventBus::with_router(router), store)
    }

    #[test]
    fn wire_shape_uses_type_and_camel_case() {
        let event = DomainEvent::new(NotificationKind::Payment, "proj-1", "paid")
            .with_recipient("rec1");
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "payment");
        assert_eq!(json["projectId"], "proj-1");
        assert_eq!(json["recipientId"], "rec1");
        assert!(json.get("actorId").is_none());
    }

    #[test]
    fn wire_shape_without_optional_fields_parses() {
        let event: DomainEvent = serde_json::from_value(serde_json::json!({
            "type": "application",
            "projectId": "proj-2",
            "message": "New application received for your project",
        }))
        .unwrap();

        assert_eq!(event.kind, NotificationKind::Application);
        assert!(event.recipient_id.is_none());
        assert!(event.actor_id.is_none());
    }

    #[tokio::test]
    async fn observers_receive_routed_events() {
        let (bus, _store) = bus_with_project().await;
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let notification = bus
            .publish(DomainEvent::new(
                NotificationKind::Application,
                "proj-1",
                "New application",
            ))
            .await
            .unwrap();

        let r1 = rx1.recv().await.expect("observer 1 should receive");
        let r2 = rx2.recv().await.expect("observer 2 should receive");
        assert_eq!(r1.notification.id, notification.id);
        assert_eq!(r2.event.kind, NotificationKind::Application);
    }

    #[tokio::test]
    async fn failed_routing_is_not_broadcast() {
        let (bus, store) = bus_with_project().await;
        let mut rx = bus.subscribe();

        let result = bus
            .publish(DomainEvent::new(NotificationKind::Message, "proj-1", "hi"))
            .await;

        assert_matches!(result, Err(CoreError::RecipientResolution(_)));
        assert_matches!(rx.try_recv(), Err(broadcast::error::TryRecvError::Empty));
        assert_eq!(store.notification_count().await, 0);
    }

    #[tokio::test]
    async fn publish_with_no_observers_still_persists() {
        let (bus, store) = bus_with_project().await;

        bus.publish(DomainEvent::new(
            NotificationKind::ProjectUpdate,
            "proj-1",
            "Status changed to in_progress",
        ))
        .await
        .unwrap();

        assert_eq!(store.notification_count().await, 1);
    }
}
