//! Gigline shared domain vocabulary.
//!
//! This crate has no internal dependencies so that the store, event,
//! messaging, payment and API crates all agree on the same identifiers,
//! error taxonomy, notification kinds and input rules.

pub mod error;
pub mod messaging;
pub mod notification_kind;
pub mod payment;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use notification_kind::NotificationKind;
