//! Project conversations: the ordered message log, live subscriptions and
//! the replaying feed used by (re)connecting clients.

pub mod channel;
pub mod feed;
pub mod subscription;

pub use channel::MessageChannel;
pub use feed::ConversationFeed;
pub use subscription::{Subscription, SubscriptionHandle};
