//! Delivery outbox: the relay handle the router enqueues into, and the
//! background worker that drains it.

use std::sync::Arc;

use gigline_db::models::notification::Notification;
use gigline_db::ProfileDirectory;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use super::template::{dashboard_url, render_notification_email};
use super::{DeliveryError, EmailReceipt, EmailTransport, OutgoingEmail};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Default number of relay attempts allowed in flight at once.
const DEFAULT_CONCURRENCY: usize = 8;

/// Default application URL used for the dashboard link.
const DEFAULT_APP_BASE_URL: &str = "http://localhost:5173";

/// Settings for the delivery worker.
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Max concurrent relay attempts (`DELIVERY_CONCURRENCY`).
    pub concurrency: usize,
    /// Base URL of the web app (`APP_BASE_URL`).
    pub app_base_url: String,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            app_base_url: DEFAULT_APP_BASE_URL.to_string(),
        }
    }
}

impl DeliveryConfig {
    /// Load from environment variables, falling back to defaults.
    ///
    /// Fails if `DELIVERY_CONCURRENCY` is set but is not a positive integer.
    pub fn from_env() -> Result<Self, String> {
        let concurrency = match std::env::var("DELIVERY_CONCURRENCY") {
            Ok(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(format!(
                        "DELIVERY_CONCURRENCY must be a positive integer, got '{raw}'"
                    ))
                }
            },
            Err(_) => DEFAULT_CONCURRENCY,
        };

        Ok(Self {
            concurrency,
            app_base_url: std::env::var("APP_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_APP_BASE_URL.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// Relay / queue
// ---------------------------------------------------------------------------

/// One queued relay attempt.
#[derive(Debug, Clone)]
pub struct DeliveryJob {
    pub notification: Notification,
}

/// Producer half of the delivery outbox. Cheap to clone.
#[derive(Debug, Clone)]
pub struct DeliveryRelay {
    sender: mpsc::UnboundedSender<DeliveryJob>,
}

/// Consumer half of the delivery outbox, owned by the worker.
#[derive(Debug)]
pub struct DeliveryQueue {
    receiver: mpsc::UnboundedReceiver<DeliveryJob>,
}

impl DeliveryRelay {
    /// Create a connected relay/queue pair.
    pub fn channel() -> (DeliveryRelay, DeliveryQueue) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (DeliveryRelay { sender }, DeliveryQueue { receiver })
    }

    /// Queue a relay attempt without waiting for it.
    ///
    /// Returns `false` when the worker is gone; the attempt is then dropped
    /// and logged.
    pub fn enqueue(&self, notification: Notification) -> bool {
        let notification_id = notification.id;
        match self.sender.send(DeliveryJob { notification }) {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(
                    %notification_id,
                    "Delivery worker is not running, email dropped"
                );
                false
            }
        }
    }
}

impl DeliveryQueue {
    /// Next queued job, or `None` once every relay handle is dropped.
    pub async fn recv(&mut self) -> Option<DeliveryJob> {
        self.receiver.recv().await
    }

    /// Stop accepting jobs and discard what is still queued.
    ///
    /// Returns the number of discarded jobs.
    fn close_and_drain(&mut self) -> usize {
        self.receiver.close();
        let mut dropped = 0;
        while self.receiver.try_recv().is_ok() {
            dropped += 1;
        }
        dropped
    }
}

// ---------------------------------------------------------------------------
// DeliveryWorker
// ---------------------------------------------------------------------------

/// Background service that turns queued notifications into emails.
pub struct DeliveryWorker {
    profiles: Arc<dyn ProfileDirectory>,
    transport: Arc<dyn EmailTransport>,
    dashboard_url: String,
    concurrency: usize,
}

impl DeliveryWorker {
    pub fn new(
        profiles: Arc<dyn ProfileDirectory>,
        transport: Arc<dyn EmailTransport>,
        config: &DeliveryConfig,
    ) -> Self {
        Self {
            profiles,
            transport,
            dashboard_url: dashboard_url(&config.app_base_url),
            concurrency: config.concurrency.max(1),
        }
    }

    /// Drain the queue until cancelled or until every relay handle is gone.
    ///
    /// At most `concurrency` attempts run at once and attempts for
    /// different notifications may finish in any order. On exit, in-flight
    /// attempts are awaited and anything still queued is dropped.
    pub async fn run(self: Arc<Self>, mut queue: DeliveryQueue, cancel: CancellationToken) {
        let permits = Arc::new(Semaphore::new(self.concurrency));
        let mut in_flight = JoinSet::new();

        tracing::info!(concurrency = self.concurrency, "Delivery worker started");

        loop {
            let permit = tokio::select! {
                _ = cancel.cancelled() => break,
                permit = Arc::clone(&permits).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let job = tokio::select! {
                _ = cancel.cancelled() => break,
                job = queue.recv() => match job {
                    Some(job) => job,
                    None => break,
                },
            };

            while let Some(result) = in_flight.try_join_next() {
                log_join_result(result);
            }

            let worker = Arc::clone(&self);
            in_flight.spawn(async move {
                let _permit = permit;
                worker.deliver(&job.notification).await;
            });
        }

        while let Some(result) = in_flight.join_next().await {
            log_join_result(result);
        }

        let dropped = queue.close_and_drain();
        if dropped > 0 {
            tracing::warn!(dropped, "Delivery worker stopped with queued emails");
        }
        tracing::info!("Delivery worker stopped");
    }

    /// Make one relay attempt for a notification.
    ///
    /// Never fails: any error is logged and the attempt is dropped.
    pub async fn deliver(&self, notification: &Notification) {
        match self.attempt(notification).await {
            Ok(receipt) => {
                tracing::info!(
                    notification_id = %notification.id,
                    user_id = %notification.user_id,
                    receipt_id = %receipt.id,
                    "Notification email sent"
                );
            }
            Err(DeliveryError::MissingContact(user_id)) => {
                tracing::warn!(
                    notification_id = %notification.id,
                    %user_id,
                    "No email address for recipient, email skipped"
                );
            }
            Err(e) => {
                tracing::error!(
                    notification_id = %notification.id,
                    user_id = %notification.user_id,
                    error = %e,
                    "Notification email failed"
                );
            }
        }
    }

    async fn attempt(&self, notification: &Notification) -> Result<EmailReceipt, DeliveryError> {
        let contact = self
            .profiles
            .get_contact(&notification.user_id)
            .await?
            .ok_or_else(|| DeliveryError::MissingContact(notification.user_id.clone()))?;

        let to = contact
            .email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .ok_or_else(|| DeliveryError::MissingContact(notification.user_id.clone()))?
            .to_string();

        let email = OutgoingEmail {
            to,
            subject: notification.title.clone(),
            html_body: render_notification_email(
                &notification.title,
                &notification.message,
                contact.display_name.as_deref(),
                &self.dashboard_url,
            ),
        };

        self.transport.send(&email).await
    }
}

fn log_join_result(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        tracing::error!(error = %e, "Delivery task panicked");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use gigline_core::types::new_record_id;
    use gigline_core::NotificationKind;

    use super::*;

    fn notification() -> Notification {
        Notification {
            id: new_record_id(),
            user_id: "u1".into(),
            title: "t".into(),
            message: "m".into(),
            kind: NotificationKind::Payment,
            related_id: "proj-1".into(),
            read: false,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn default_config() {
        let config = DeliveryConfig::default();
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.app_base_url, "http://localhost:5173");
    }

    #[test]
    fn enqueue_without_worker_reports_drop() {
        let (relay, queue) = DeliveryRelay::channel();
        drop(queue);
        assert!(!relay.enqueue(notification()));
    }

    #[test]
    fn close_and_drain_counts_leftovers() {
        let (relay, mut queue) = DeliveryRelay::channel();
        for _ in 0..3 {
            assert!(relay.enqueue(notification()));
        }
        assert_eq!(queue.close_and_drain(), 3);
        assert!(!relay.enqueue(notification()));
    }
}
