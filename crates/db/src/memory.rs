//! In-memory implementation of every store seam.
//!
//! Used when the service runs without `DATABASE_URL` and by tests. Each table
//! sits behind its own lock so conversations, inboxes and the ledger do not
//! contend with each other.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use gigline_core::messaging::MessageDraft;
use gigline_core::types::{new_record_id, RecordId, SequenceNumber, UserId};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::message::Message;
use crate::models::notification::{NewNotification, Notification};
use crate::models::payment::{NewPayment, Payment};
use crate::models::profile::Contact;
use crate::models::project::Project;
use crate::stores::{
    MessageStore, NotificationStore, PaymentLedger, ProfileDirectory, ProjectDirectory,
};

/// Process-local store holding every table in memory.
#[derive(Default)]
pub struct MemoryStore {
    messages: RwLock<HashMap<String, Vec<Message>>>,
    notifications: RwLock<Vec<Notification>>,
    payments: RwLock<Vec<Payment>>,
    projects: RwLock<HashMap<String, Project>>,
    profiles: RwLock<HashMap<UserId, Contact>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a project row.
    pub async fn put_project(&self, project: Project) {
        self.projects
            .write()
            .await
            .insert(project.id.clone(), project);
    }

    /// Insert or replace a user's contact details.
    pub async fn put_contact(&self, user_id: impl Into<UserId>, contact: Contact) {
        self.profiles.write().await.insert(user_id.into(), contact);
    }

    /// Make every subsequent operation fail with [`StoreError::Unavailable`]
    /// until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Total number of stored messages across all conversations.
    pub async fn message_count(&self) -> usize {
        self.messages.read().await.values().map(Vec::len).sum()
    }

    /// Total number of stored notifications across all users.
    pub async fn notification_count(&self) -> usize {
        self.notifications.read().await.len()
    }

    /// Total number of ledger entries.
    pub async fn payment_count(&self) -> usize {
        self.payments.read().await.len()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "in-memory store switched off".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn append(&self, draft: &MessageDraft) -> Result<Message, StoreError> {
        self.check_available()?;
        let mut conversations = self.messages.write().await;
        let log = conversations
            .entry(draft.conversation_id.clone())
            .or_default();
        let message = Message {
            id: new_record_id(),
            conversation_id: draft.conversation_id.clone(),
            sender_id: draft.sender_id.clone(),
            recipient_id: draft.recipient_id.clone(),
            content: draft.content.clone(),
            sequence_number: log.len() as SequenceNumber + 1,
            created_at: Utc::now(),
        };
        log.push(message.clone());
        Ok(message)
    }

    async fn list_for_conversation(
        &self,
        conversation_id: &str,
        after_sequence: Option<SequenceNumber>,
        limit: i64,
    ) -> Result<Vec<Message>, StoreError> {
        self.check_available()?;
        let after = after_sequence.unwrap_or(0);
        let conversations = self.messages.read().await;
        Ok(conversations
            .get(conversation_id)
            .map(|log| {
                log.iter()
                    .filter(|m| m.sequence_number > after)
                    .take(usize::try_from(limit).unwrap_or(0))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn insert(&self, input: &NewNotification) -> Result<Notification, StoreError> {
        self.check_available()?;
        let notification = Notification {
            id: new_record_id(),
            user_id: input.user_id.clone(),
            title: input.title.clone(),
            message: input.message.clone(),
            kind: input.kind,
            related_id: input.related_id.clone(),
            read: false,
            created_at: Utc::now(),
        };
        self.notifications.write().await.push(notification.clone());
        Ok(notification)
    }

    async fn find_by_id(&self, id: RecordId) -> Result<Option<Notification>, StoreError> {
        self.check_available()?;
        Ok(self
            .notifications
            .read()
            .await
            .iter()
            .find(|n| n.id == id)
            .cloned())
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, StoreError> {
        self.check_available()?;
        let notifications = self.notifications.read().await;
        // Insertion order is creation order, so reversing yields newest first.
        Ok(notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id && (!unread_only || !n.read))
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn mark_read(&self, id: RecordId, user_id: &str) -> Result<bool, StoreError> {
        self.check_available()?;
        let mut notifications = self.notifications.write().await;
        match notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
        {
            Some(n) => {
                n.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, user_id: &str) -> Result<u64, StoreError> {
        self.check_available()?;
        let mut notifications = self.notifications.write().await;
        let mut marked = 0;
        for n in notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.read)
        {
            n.read = true;
            marked += 1;
        }
        Ok(marked)
    }

    async fn unread_count(&self, user_id: &str) -> Result<i64, StoreError> {
        self.check_available()?;
        let notifications = self.notifications.read().await;
        Ok(notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.read)
            .count() as i64)
    }
}

#[async_trait]
impl PaymentLedger for MemoryStore {
    async fn record(&self, input: &NewPayment) -> Result<Payment, StoreError> {
        self.check_available()?;
        let payment = Payment {
            id: new_record_id(),
            project_id: input.project_id.clone(),
            payer_id: input.payer_id.clone(),
            recipient_id: input.recipient_id.clone(),
            amount_cents: input.amount_cents,
            external_payment_intent_id: input.external_payment_intent_id.clone(),
            status: input.status,
            created_at: Utc::now(),
        };
        self.payments.write().await.push(payment.clone());
        Ok(payment)
    }

    async fn list_for_project(&self, project_id: &str) -> Result<Vec<Payment>, StoreError> {
        self.check_available()?;
        Ok(self
            .payments
            .read()
            .await
            .iter()
            .filter(|p| p.project_id == project_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProjectDirectory for MemoryStore {
    async fn find_project(&self, project_id: &str) -> Result<Option<Project>, StoreError> {
        self.check_available()?;
        Ok(self.projects.read().await.get(project_id).cloned())
    }
}

#[async_trait]
impl ProfileDirectory for MemoryStore {
    async fn get_contact(&self, user_id: &str) -> Result<Option<Contact>, StoreError> {
        self.check_available()?;
        Ok(self.profiles.read().await.get(user_id).cloned())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
