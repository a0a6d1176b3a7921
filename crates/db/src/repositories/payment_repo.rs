//! Repository for the `payments` ledger.

use gigline_core::types::new_record_id;
use sqlx::PgPool;

use crate::models::payment::{NewPayment, Payment};

/// Column list for `payments` queries.
const COLUMNS: &str = "id, project_id, payer_id, recipient_id, amount_cents, \
                       external_payment_intent_id, status, created_at";

/// Append-only access to the payment ledger.
pub struct PaymentRepo;

impl PaymentRepo {
    /// Append a ledger entry, returning the stored row.
    pub async fn create(pool: &PgPool, input: &NewPayment) -> Result<Payment, sqlx::Error> {
        let query = format!(
            "INSERT INTO payments \
                 (id, project_id, payer_id, recipient_id, amount_cents, \
                  external_payment_intent_id, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(new_record_id())
            .bind(&input.project_id)
            .bind(&input.payer_id)
            .bind(&input.recipient_id)
            .bind(input.amount_cents)
            .bind(&input.external_payment_intent_id)
            .bind(input.status.as_str())
            .fetch_one(pool)
            .await
    }

    /// List a project's ledger entries, oldest first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: &str,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payments \
             WHERE project_id = $1 \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
