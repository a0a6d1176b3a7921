//! External email delivery for persisted notifications.
//!
//! The router hands every persisted notification to a [`DeliveryRelay`],
//! which only enqueues it. A [`DeliveryWorker`] drains the queue in the
//! background, looks up the recipient's contact details, renders the email
//! and passes it to an [`EmailTransport`]. Failures end in a log line.

pub mod email;
pub mod relay;
pub mod template;

use async_trait::async_trait;
use gigline_core::types::UserId;
use gigline_db::StoreError;

pub use email::{EmailConfig, LogOnlyTransport, SmtpTransport};
pub use relay::{DeliveryConfig, DeliveryJob, DeliveryQueue, DeliveryRelay, DeliveryWorker};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Why a single relay attempt did not reach the recipient.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The profile has no usable email address.
    #[error("No email address on file for user {0}")]
    MissingContact(UserId),

    /// The profile lookup itself failed.
    #[error("Contact lookup failed: {0}")]
    Lookup(#[from] StoreError),

    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// A non-SMTP transport refused the message.
    #[error("Email rejected by transport: {0}")]
    Rejected(String),
}

// ---------------------------------------------------------------------------
// Transport seam
// ---------------------------------------------------------------------------

/// A rendered email ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// What a transport reports for an accepted email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailReceipt {
    pub id: String,
}

/// Something that can hand an email to the outside world.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<EmailReceipt, DeliveryError>;
}
