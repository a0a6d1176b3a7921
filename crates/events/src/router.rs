//! Event-to-notification routing engine.
//!
//! [`NotificationRouter`] resolves the single recipient of a
//! [`DomainEvent`], persists a notification for them, and queues the email
//! relay. The persisted row is the durability boundary: once `route`
//! returns, nothing downstream can remove it.

use std::sync::Arc;

use gigline_core::error::CoreError;
use gigline_core::types::UserId;
use gigline_core::NotificationKind;
use gigline_db::models::notification::{NewNotification, Notification};
use gigline_db::models::project::Project;
use gigline_db::{NotificationStore, ProjectDirectory};

use crate::bus::DomainEvent;
use crate::delivery::DeliveryRelay;

/// Routes domain events to per-user notifications.
pub struct NotificationRouter {
    projects: Arc<dyn ProjectDirectory>,
    notifications: Arc<dyn NotificationStore>,
    relay: DeliveryRelay,
}

impl NotificationRouter {
    pub fn new(
        projects: Arc<dyn ProjectDirectory>,
        notifications: Arc<dyn NotificationStore>,
        relay: DeliveryRelay,
    ) -> Self {
        Self {
            projects,
            notifications,
            relay,
        }
    }

    /// Resolve, persist, and queue delivery for a single event.
    ///
    /// Fails with [`CoreError::RecipientResolution`] when the project or the
    /// recipient cannot be determined; no row is written in that case.
    pub async fn route(&self, event: &DomainEvent) -> Result<Notification, CoreError> {
        let project = self
            .projects
            .find_project(&event.project_id)
            .await?
            .ok_or_else(|| {
                CoreError::RecipientResolution(format!(
                    "project {} does not exist",
                    event.project_id
                ))
            })?;

        let user_id = resolve_recipient(event, &project)?;

        let notification = self
            .notifications
            .insert(&NewNotification {
                user_id,
                title: event.kind.title(&project.title),
                message: event.message.clone(),
                kind: event.kind,
                related_id: project.id.clone(),
            })
            .await?;

        tracing::debug!(
            notification_id = %notification.id,
            user_id = %notification.user_id,
            kind = %notification.kind,
            project_id = %notification.related_id,
            "Notification persisted"
        );

        self.relay.enqueue(notification.clone());

        Ok(notification)
    }
}

/// Pick the recipient of an event according to its kind.
///
/// | kind             | recipient                                  |
/// |------------------|--------------------------------------------|
/// | `application`    | the project's client                       |
/// | `message`        | the event's explicit recipient             |
/// | `payment`        | the event's explicit recipient             |
/// | `project_update` | the participant that is not the actor      |
pub fn resolve_recipient(event: &DomainEvent, project: &Project) -> Result<UserId, CoreError> {
    let (candidate, source) = match event.kind {
        NotificationKind::Application => (project.client_id.as_ref(), "project client"),
        NotificationKind::Message | NotificationKind::Payment => {
            (event.recipient_id.as_ref(), "explicit recipient")
        }
        NotificationKind::ProjectUpdate => (
            project.counterpart_of(event.actor_id.as_deref()),
            "project counterpart",
        ),
    };

    candidate
        .filter(|id| !id.trim().is_empty())
        .cloned()
        .ok_or_else(|| {
            CoreError::RecipientResolution(format!(
                "{} event for project {} has no {source}",
                event.kind, event.project_id
            ))
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
