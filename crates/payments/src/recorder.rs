//! Charge, record, announce.
//!
//! [`PaymentRecorder::process_payment`] is the only writer of the payment
//! ledger. A ledger row exists only for a charge the gateway reported as
//! succeeded, and a `payment` event is raised only for a recorded row.

use std::sync::Arc;

use gigline_core::error::CoreError;
use gigline_core::payment::{payment_notice, CardData, PaymentDraft, PaymentStatus};
use gigline_core::NotificationKind;
use gigline_db::models::payment::{NewPayment, Payment};
use gigline_db::PaymentLedger;
use gigline_events::{DomainEvent, EventBus};
use tokio::sync::Mutex;
use validator::Validate;

use crate::gateway::{ChargeRequest, ChargeStatus, GatewayError, PaymentGateway};

/// Records gateway-confirmed payments in the ledger.
pub struct PaymentRecorder {
    gateway: Arc<dyn PaymentGateway>,
    ledger: Arc<dyn PaymentLedger>,
    bus: Arc<EventBus>,
    /// Serializes ledger appends.
    append_lock: Mutex<()>,
}

impl PaymentRecorder {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        ledger: Arc<dyn PaymentLedger>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            gateway,
            ledger,
            bus,
            append_lock: Mutex::new(()),
        }
    }

    /// Charge the card and, on success, record a completed payment and
    /// notify the recipient.
    ///
    /// A non-positive amount fails validation before the gateway is
    /// called. A gateway failure yields [`CoreError::PaymentGateway`] with
    /// nothing written and nothing published. A routing failure after the
    /// row is written is logged and the payment is still returned.
    pub async fn process_payment(
        &self,
        draft: PaymentDraft,
        card: CardData,
    ) -> Result<Payment, CoreError> {
        draft.validate()?;

        let charge = self
            .gateway
            .charge(&ChargeRequest {
                amount_cents: draft.amount_cents,
                card,
            })
            .await
            .and_then(|result| match result.status {
                ChargeStatus::Succeeded => Ok(result),
                other => Err(GatewayError::Declined(format!(
                    "payment intent {} ended with status {other:?}",
                    result.payment_intent_id
                ))),
            });

        let charge = match charge {
            Ok(charge) => charge,
            Err(e) => {
                tracing::warn!(
                    project_id = %draft.project_id,
                    payer_id = %draft.payer_id,
                    amount_cents = draft.amount_cents,
                    error = %e,
                    "Payment charge failed"
                );
                return Err(e.into());
            }
        };

        let payment = {
            let _guard = self.append_lock.lock().await;
            self.ledger
                .record(&NewPayment {
                    project_id: draft.project_id.clone(),
                    payer_id: draft.payer_id.clone(),
                    recipient_id: draft.recipient_id.clone(),
                    amount_cents: draft.amount_cents,
                    external_payment_intent_id: charge.payment_intent_id.clone(),
                    status: PaymentStatus::Completed,
                })
                .await?
        };

        tracing::info!(
            payment_id = %payment.id,
            project_id = %payment.project_id,
            payment_intent_id = %payment.external_payment_intent_id,
            amount_cents = payment.amount_cents,
            "Payment recorded"
        );

        let event = DomainEvent::new(
            NotificationKind::Payment,
            payment.project_id.clone(),
            payment_notice(payment.amount_cents),
        )
        .with_recipient(payment.recipient_id.clone())
        .with_actor(payment.payer_id.clone());

        if let Err(e) = self.bus.publish(event).await {
            tracing::warn!(
                payment_id = %payment.id,
                project_id = %payment.project_id,
                recipient_id = %payment.recipient_id,
                error = %e,
                "Payment recorded but notification routing failed"
            );
        }

        Ok(payment)
    }

    /// Ledger entries of a project, oldest first.
    pub async fn list_payments(&self, project_id: &str) -> Result<Vec<Payment>, CoreError> {
        Ok(self.ledger.list_for_project(project_id).await?)
    }
}
