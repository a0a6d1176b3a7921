//! Real-time notification push.
//!
//! [`NotificationPush`] observes the event bus and forwards every routed
//! notification to the recipient's open WebSocket connections.

pub mod push;

pub use push::NotificationPush;
