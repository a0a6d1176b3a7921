//! Gigline event bus and notification pipeline.
//!
//! - [`EventBus`]: ingestion point for [`DomainEvent`]s; returns once the
//!   resulting notification is durable and then broadcasts a
//!   [`RoutedEvent`] to observers.
//! - [`NotificationRouter`]: recipient resolution and notification
//!   persistence.
//! - [`delivery`]: the email outbox ([`DeliveryRelay`]) and the background
//!   [`DeliveryWorker`] that drains it.

pub mod bus;
pub mod delivery;
pub mod router;

pub use bus::{DomainEvent, EventBus, RoutedEvent};
pub use delivery::{
    DeliveryConfig, DeliveryError, DeliveryQueue, DeliveryRelay, DeliveryWorker, EmailConfig,
    EmailReceipt, EmailTransport, LogOnlyTransport, OutgoingEmail, SmtpTransport,
};
pub use router::NotificationRouter;
