//! Store seams injected into the messaging, routing, relay and payment
//! components.
//!
//! Each table has exactly one owning component; the traits are the only
//! way those components touch storage. Implementations exist for
//! PostgreSQL ([`PgStore`](crate::postgres::PgStore)) and memory
//! ([`MemoryStore`](crate::memory::MemoryStore)).

use async_trait::async_trait;
use gigline_core::messaging::MessageDraft;
use gigline_core::types::{RecordId, SequenceNumber};

use crate::error::StoreError;
use crate::models::message::Message;
use crate::models::notification::{NewNotification, Notification};
use crate::models::payment::{NewPayment, Payment};
use crate::models::profile::Contact;
use crate::models::project::Project;

/// The conversation message log.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append a validated draft with the conversation's next sequence number.
    async fn append(&self, draft: &MessageDraft) -> Result<Message, StoreError>;

    /// Messages of a conversation after `after_sequence`, ascending.
    async fn list_for_conversation(
        &self,
        conversation_id: &str,
        after_sequence: Option<SequenceNumber>,
        limit: i64,
    ) -> Result<Vec<Message>, StoreError>;
}

/// Per-user notification inbox.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert(&self, input: &NewNotification) -> Result<Notification, StoreError>;

    async fn find_by_id(&self, id: RecordId) -> Result<Option<Notification>, StoreError>;

    /// Newest first.
    async fn list_for_user(
        &self,
        user_id: &str,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, StoreError>;

    /// Returns `false` when no notification with that id belongs to the user.
    async fn mark_read(&self, id: RecordId, user_id: &str) -> Result<bool, StoreError>;

    async fn mark_all_read(&self, user_id: &str) -> Result<u64, StoreError>;

    async fn unread_count(&self, user_id: &str) -> Result<i64, StoreError>;
}

/// The append-only payment ledger.
#[async_trait]
pub trait PaymentLedger: Send + Sync {
    async fn record(&self, input: &NewPayment) -> Result<Payment, StoreError>;

    /// Oldest first.
    async fn list_for_project(&self, project_id: &str) -> Result<Vec<Payment>, StoreError>;
}

/// Project participants, owned by the project service.
#[async_trait]
pub trait ProjectDirectory: Send + Sync {
    async fn find_project(&self, project_id: &str) -> Result<Option<Project>, StoreError>;
}

/// User contact details, owned by the profile service.
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    async fn get_contact(&self, user_id: &str) -> Result<Option<Contact>, StoreError>;
}
