//! WebSocket infrastructure for real-time notification push and
//! conversation streaming.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::{conversation_ws, notifications_ws, FeedQuery};
pub use heartbeat::{start_heartbeat, HEARTBEAT_INTERVAL};
pub use manager::{ConnectionKind, WsManager};
