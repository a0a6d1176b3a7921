//! Replay-then-live view of a conversation for (re)joining clients.

use std::collections::{HashSet, VecDeque};
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use gigline_core::types::{RecordId, SequenceNumber};
use gigline_db::models::message::Message;

use crate::subscription::{Subscription, SubscriptionHandle};

/// Messages after a client's last seen sequence number: first the stored
/// backlog, then live messages, each yielded exactly once and in order.
///
/// Built by [`MessageChannel::join`](crate::MessageChannel::join), which
/// subscribes before reading the backlog so nothing committed in between is
/// lost. Live messages that the backlog already contained are skipped.
#[derive(Debug)]
pub struct ConversationFeed {
    backlog: VecDeque<Message>,
    replayed: HashSet<RecordId>,
    live: Subscription,
    last_sequence: SequenceNumber,
}

impl ConversationFeed {
    pub(crate) fn new(
        backlog: Vec<Message>,
        live: Subscription,
        last_seen: Option<SequenceNumber>,
    ) -> Self {
        Self {
            replayed: backlog.iter().map(|m| m.id).collect(),
            backlog: backlog.into(),
            live,
            last_sequence: last_seen.unwrap_or(0),
        }
    }

    pub fn handle(&self) -> &SubscriptionHandle {
        self.live.handle()
    }

    /// Sequence number of the last message yielded, or the starting point.
    pub fn last_sequence(&self) -> SequenceNumber {
        self.last_sequence
    }

    /// Next message, or `None` once the underlying subscription is closed.
    pub async fn next_message(&mut self) -> Option<Message> {
        std::future::poll_fn(|cx| self.poll_message(cx)).await
    }

    fn accept(&mut self, message: &Message, from_backlog: bool) -> bool {
        if message.sequence_number <= self.last_sequence {
            return false;
        }
        if !from_backlog && self.replayed.contains(&message.id) {
            return false;
        }
        self.last_sequence = message.sequence_number;
        true
    }

    fn poll_message(&mut self, cx: &mut Context<'_>) -> Poll<Option<Message>> {
        while let Some(message) = self.backlog.pop_front() {
            if self.accept(&message, true) {
                return Poll::Ready(Some(message));
            }
        }
        loop {
            match Pin::new(&mut self.live).poll_next(cx) {
                Poll::Ready(Some(message)) => {
                    if self.accept(&message, false) {
                        return Poll::Ready(Some(message));
                    }
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl Stream for ConversationFeed {
    type Item = Message;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Message>> {
        self.poll_message(cx)
    }
}
