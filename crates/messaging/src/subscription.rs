//! Live subscriptions to a conversation.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use gigline_core::types::ProjectId;
use gigline_db::models::message::Message;
use tokio::sync::mpsc;

/// Identifies one open subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    pub conversation_id: ProjectId,
    pub(crate) id: u64,
}

/// Messages committed to a conversation after the subscription was opened,
/// in commit order.
///
/// The stream ends after the subscription is closed and its buffer is
/// drained. Dropping a subscription without closing it is allowed; the
/// channel forgets it on the next append.
#[derive(Debug)]
pub struct Subscription {
    handle: SubscriptionHandle,
    receiver: mpsc::UnboundedReceiver<Message>,
}

impl Subscription {
    pub(crate) fn new(handle: SubscriptionHandle, receiver: mpsc::UnboundedReceiver<Message>) -> Self {
        Self { handle, receiver }
    }

    pub fn handle(&self) -> &SubscriptionHandle {
        &self.handle
    }

    /// Next live message, or `None` once closed.
    pub async fn recv(&mut self) -> Option<Message> {
        self.receiver.recv().await
    }

    /// Non-blocking variant of [`recv`](Self::recv).
    pub fn try_recv(&mut self) -> Option<Message> {
        self.receiver.try_recv().ok()
    }
}

impl Stream for Subscription {
    type Item = Message;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Message>> {
        self.receiver.poll_recv(cx)
    }
}
