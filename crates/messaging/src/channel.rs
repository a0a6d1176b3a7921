//! Per-project conversation log with live fan-out.
//!
//! Appends to one conversation are serialized by that conversation's write
//! lock, and fan-out to subscribers happens while the lock is still held,
//! so every subscriber sees messages in commit order. Different
//! conversations never contend with each other.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use gigline_core::error::CoreError;
use gigline_core::messaging::{clamp_history_limit, notification_preview, MessageDraft};
use gigline_core::types::{ProjectId, SequenceNumber};
use gigline_core::NotificationKind;
use gigline_db::models::message::Message;
use gigline_db::MessageStore;
use gigline_events::{DomainEvent, EventBus};
use tokio::sync::{mpsc, Mutex, RwLock};

use crate::feed::ConversationFeed;
use crate::subscription::{Subscription, SubscriptionHandle};

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Conversation {
    /// Held across sequence assignment, append and fan-out.
    write_lock: Mutex<()>,
    subscribers: RwLock<HashMap<u64, mpsc::UnboundedSender<Message>>>,
}

impl Conversation {
    /// Push a committed message to every subscriber, forgetting the ones
    /// whose receiving side is gone.
    async fn fan_out(&self, message: &Message) {
        let mut dead = Vec::new();
        {
            let subscribers = self.subscribers.read().await;
            for (id, sender) in subscribers.iter() {
                if sender.send(message.clone()).is_err() {
                    dead.push(*id);
                }
            }
        }
        if !dead.is_empty() {
            let mut subscribers = self.subscribers.write().await;
            for id in dead {
                subscribers.remove(&id);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// MessageChannel
// ---------------------------------------------------------------------------

/// Ordered message log for every project conversation.
///
/// Designed to be shared via `Arc<MessageChannel>`.
pub struct MessageChannel {
    store: Arc<dyn MessageStore>,
    bus: Arc<EventBus>,
    conversations: RwLock<HashMap<ProjectId, Arc<Conversation>>>,
    next_subscription: AtomicU64,
}

impl MessageChannel {
    pub fn new(store: Arc<dyn MessageStore>, bus: Arc<EventBus>) -> Self {
        Self {
            store,
            bus,
            conversations: RwLock::new(HashMap::new()),
            next_subscription: AtomicU64::new(1),
        }
    }

    async fn conversation(&self, conversation_id: &str) -> Arc<Conversation> {
        if let Some(existing) = self.conversations.read().await.get(conversation_id) {
            return Arc::clone(existing);
        }
        let mut conversations = self.conversations.write().await;
        Arc::clone(
            conversations
                .entry(conversation_id.to_string())
                .or_default(),
        )
    }

    /// Forget a conversation's in-memory state once nothing references it.
    ///
    /// New references are only handed out under the map lock, so a strong
    /// count of one while holding the write lock means no writer or opener
    /// is in flight.
    async fn release_if_idle(&self, conversation_id: &str) {
        let mut conversations = self.conversations.write().await;
        let Some(conversation) = conversations.get(conversation_id) else {
            return;
        };
        if Arc::strong_count(conversation) == 1 && conversation.subscribers.read().await.is_empty() {
            conversations.remove(conversation_id);
            tracing::trace!(conversation_id, "Idle conversation released");
        }
    }

    /// Start receiving messages committed to a conversation from now on.
    ///
    /// No history is replayed; use [`join`](Self::join) for that.
    pub async fn open_channel(&self, conversation_id: &str) -> Subscription {
        let conversation = self.conversation(conversation_id).await;
        let id = self.next_subscription.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::unbounded_channel();
        conversation.subscribers.write().await.insert(id, sender);

        tracing::debug!(conversation_id, subscription = id, "Subscription opened");

        Subscription::new(
            SubscriptionHandle {
                conversation_id: conversation_id.to_string(),
                id,
            },
            receiver,
        )
    }

    /// Release a subscription. Closing an unknown or already closed handle
    /// is a no-op.
    ///
    /// Returns whether the handle was open.
    pub async fn close_channel(&self, handle: &SubscriptionHandle) -> bool {
        let conversation = self
            .conversations
            .read()
            .await
            .get(&handle.conversation_id)
            .cloned();
        let Some(conversation) = conversation else {
            return false;
        };
        let removed = conversation
            .subscribers
            .write()
            .await
            .remove(&handle.id)
            .is_some();
        drop(conversation);
        if removed {
            tracing::debug!(
                conversation_id = %handle.conversation_id,
                subscription = handle.id,
                "Subscription closed"
            );
            self.release_if_idle(&handle.conversation_id).await;
        }
        removed
    }

    /// Number of open subscriptions on a conversation.
    pub async fn subscriber_count(&self, conversation_id: &str) -> usize {
        match self.conversations.read().await.get(conversation_id) {
            Some(conversation) => conversation.subscribers.read().await.len(),
            None => 0,
        }
    }

    /// Validate, commit and fan out a message, then raise a `message` event
    /// for the recipient.
    ///
    /// Returns once the message is committed and the notification has been
    /// routed. A routing failure is logged and does not fail the send, since
    /// the committed message cannot be withdrawn.
    pub async fn send_message(
        &self,
        conversation_id: &str,
        sender_id: &str,
        recipient_id: &str,
        content: &str,
    ) -> Result<Message, CoreError> {
        let draft = MessageDraft::new(conversation_id, sender_id, recipient_id, content).validated()?;
        let conversation = self.conversation(&draft.conversation_id).await;

        let message = {
            let _guard = conversation.write_lock.lock().await;
            let message = self.store.append(&draft).await?;
            conversation.fan_out(&message).await;
            message
        };
        drop(conversation);
        self.release_if_idle(&message.conversation_id).await;

        tracing::debug!(
            conversation_id = %message.conversation_id,
            sequence = message.sequence_number,
            message_id = %message.id,
            "Message committed"
        );

        let event = DomainEvent::new(
            NotificationKind::Message,
            message.conversation_id.clone(),
            notification_preview(&message.content),
        )
        .with_recipient(message.recipient_id.clone())
        .with_actor(message.sender_id.clone());

        if let Err(e) = self.bus.publish(event).await {
            tracing::warn!(
                conversation_id = %message.conversation_id,
                message_id = %message.id,
                recipient_id = %message.recipient_id,
                error = %e,
                "Message committed but notification routing failed"
            );
        }

        Ok(message)
    }

    /// Stored messages after `after_sequence`, ascending.
    ///
    /// `limit` defaults to 100 and is clamped to `1..=500`.
    pub async fn history(
        &self,
        conversation_id: &str,
        after_sequence: Option<SequenceNumber>,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, CoreError> {
        Ok(self
            .store
            .list_for_conversation(conversation_id, after_sequence, clamp_history_limit(limit))
            .await?)
    }

    /// Subscribe, then load everything after `last_seen`.
    ///
    /// The returned feed yields the backlog followed by live messages, with
    /// no gaps and no duplicates.
    pub async fn join(
        &self,
        conversation_id: &str,
        last_seen: Option<SequenceNumber>,
    ) -> Result<ConversationFeed, CoreError> {
        let subscription = self.open_channel(conversation_id).await;

        let page_size = clamp_history_limit(Some(i64::MAX));
        let mut backlog: Vec<Message> = Vec::new();
        let mut cursor = last_seen;
        loop {
            let page = match self.history(conversation_id, cursor, Some(page_size)).await {
                Ok(page) => page,
                Err(e) => {
                    self.close_channel(subscription.handle()).await;
                    return Err(e);
                }
            };
            let full = page.len() as i64 == page_size;
            cursor = page.last().map(|m| m.sequence_number).or(cursor);
            backlog.extend(page);
            if !full {
                break;
            }
        }

        Ok(ConversationFeed::new(backlog, subscription, last_seen))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
