//! Repository for the `messages` table.

use gigline_core::messaging::MessageDraft;
use gigline_core::types::{new_record_id, SequenceNumber};
use sqlx::PgPool;

use crate::models::message::Message;

/// Column list for `messages` queries.
const COLUMNS: &str =
    "id, conversation_id, sender_id, recipient_id, content, sequence_number, created_at";

/// Append-only access to conversation logs.
pub struct MessageRepo;

impl MessageRepo {
    /// Append a message, assigning the next sequence number of its
    /// conversation inside the same statement.
    ///
    /// A transaction-scoped advisory lock keyed on the conversation id
    /// serializes appends to one conversation across processes, so the
    /// `MAX + 1` read never races another writer.
    pub async fn append(pool: &PgPool, draft: &MessageDraft) -> Result<Message, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&draft.conversation_id)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO messages \
                 (id, conversation_id, sender_id, recipient_id, content, sequence_number) \
             SELECT $1, $2, $3, $4, $5, COALESCE(MAX(sequence_number), 0) + 1 \
             FROM messages WHERE conversation_id = $2 \
             RETURNING {COLUMNS}"
        );
        let message = sqlx::query_as::<_, Message>(&query)
            .bind(new_record_id())
            .bind(&draft.conversation_id)
            .bind(&draft.sender_id)
            .bind(&draft.recipient_id)
            .bind(&draft.content)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(message)
    }

    /// List a conversation in ascending sequence order.
    ///
    /// When `after_sequence` is set only later messages are returned.
    pub async fn list_for_conversation(
        pool: &PgPool,
        conversation_id: &str,
        after_sequence: Option<SequenceNumber>,
        limit: i64,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages \
             WHERE conversation_id = $1 AND sequence_number > $2 \
             ORDER BY sequence_number ASC \
             LIMIT $3"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(conversation_id)
            .bind(after_sequence.unwrap_or(0))
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
