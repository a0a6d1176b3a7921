//! PostgreSQL implementation of every store seam.

use async_trait::async_trait;
use gigline_core::messaging::MessageDraft;
use gigline_core::types::{RecordId, SequenceNumber};

use crate::error::StoreError;
use crate::models::message::Message;
use crate::models::notification::{NewNotification, Notification};
use crate::models::payment::{NewPayment, Payment};
use crate::models::profile::Contact;
use crate::models::project::Project;
use crate::repositories::{MessageRepo, NotificationRepo, PaymentRepo, ProfileRepo, ProjectRepo};
use crate::stores::{
    MessageStore, NotificationStore, PaymentLedger, ProfileDirectory, ProjectDirectory,
};
use crate::DbPool;

/// Store handle backed by a connection pool. Cheap to clone.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl MessageStore for PgStore {
    async fn append(&self, draft: &MessageDraft) -> Result<Message, StoreError> {
        Ok(MessageRepo::append(&self.pool, draft).await?)
    }

    async fn list_for_conversation(
        &self,
        conversation_id: &str,
        after_sequence: Option<SequenceNumber>,
        limit: i64,
    ) -> Result<Vec<Message>, StoreError> {
        Ok(
            MessageRepo::list_for_conversation(&self.pool, conversation_id, after_sequence, limit)
                .await?,
        )
    }
}

#[async_trait]
impl NotificationStore for PgStore {
    async fn insert(&self, input: &NewNotification) -> Result<Notification, StoreError> {
        Ok(NotificationRepo::create(&self.pool, input).await?)
    }

    async fn find_by_id(&self, id: RecordId) -> Result<Option<Notification>, StoreError> {
        Ok(NotificationRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, StoreError> {
        Ok(
            NotificationRepo::list_for_user(&self.pool, user_id, unread_only, limit, offset)
                .await?,
        )
    }

    async fn mark_read(&self, id: RecordId, user_id: &str) -> Result<bool, StoreError> {
        Ok(NotificationRepo::mark_read(&self.pool, id, user_id).await?)
    }

    async fn mark_all_read(&self, user_id: &str) -> Result<u64, StoreError> {
        Ok(NotificationRepo::mark_all_read(&self.pool, user_id).await?)
    }

    async fn unread_count(&self, user_id: &str) -> Result<i64, StoreError> {
        Ok(NotificationRepo::unread_count(&self.pool, user_id).await?)
    }
}

#[async_trait]
impl PaymentLedger for PgStore {
    async fn record(&self, input: &NewPayment) -> Result<Payment, StoreError> {
        Ok(PaymentRepo::create(&self.pool, input).await?)
    }

    async fn list_for_project(&self, project_id: &str) -> Result<Vec<Payment>, StoreError> {
        Ok(PaymentRepo::list_for_project(&self.pool, project_id).await?)
    }
}

#[async_trait]
impl ProjectDirectory for PgStore {
    async fn find_project(&self, project_id: &str) -> Result<Option<Project>, StoreError> {
        Ok(ProjectRepo::find_by_id(&self.pool, project_id).await?)
    }
}

#[async_trait]
impl ProfileDirectory for PgStore {
    async fn get_contact(&self, user_id: &str) -> Result<Option<Contact>, StoreError> {
        Ok(ProfileRepo::find_contact(&self.pool, user_id).await?)
    }
}
