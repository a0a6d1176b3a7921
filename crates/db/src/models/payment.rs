//! Payment ledger model and insert DTO.

use gigline_core::payment::PaymentStatus;
use gigline_core::types::{ProjectId, RecordId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `payments` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: RecordId,
    pub project_id: ProjectId,
    pub payer_id: UserId,
    pub recipient_id: UserId,
    /// Amount in minor units (cents).
    pub amount_cents: i64,
    pub external_payment_intent_id: String,
    #[sqlx(try_from = "String")]
    pub status: PaymentStatus,
    pub created_at: Timestamp,
}

/// DTO for appending a ledger entry.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub project_id: ProjectId,
    pub payer_id: UserId,
    pub recipient_id: UserId,
    pub amount_cents: i64,
    pub external_payment_intent_id: String,
    pub status: PaymentStatus,
}
