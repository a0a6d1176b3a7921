//! Conversation message model.

use gigline_core::types::{ProjectId, RecordId, SequenceNumber, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `messages` table. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: RecordId,
    /// The owning project's id.
    pub conversation_id: ProjectId,
    pub sender_id: UserId,
    pub recipient_id: UserId,
    pub content: String,
    /// Commit position within the conversation, starting at 1.
    pub sequence_number: SequenceNumber,
    pub created_at: Timestamp,
}
