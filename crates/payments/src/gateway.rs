//! The payment gateway seam and its request/response contract.

use async_trait::async_trait;
use gigline_core::error::CoreError;
use gigline_core::payment::CardData;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Why a charge did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway returned a non-2xx status code.
    #[error("Gateway returned HTTP {0}")]
    HttpStatus(u16),

    /// The gateway processed the request but did not take the money.
    #[error("Charge declined: {0}")]
    Declined(String),

    /// The card details failed local checks.
    #[error("Invalid card: {0}")]
    InvalidCard(String),
}

impl From<GatewayError> for CoreError {
    fn from(err: GatewayError) -> Self {
        CoreError::PaymentGateway(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

/// Body of a charge call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeRequest {
    pub amount_cents: i64,
    pub card: CardData,
}

/// Gateway-side status of a payment intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeStatus {
    Succeeded,
    Failed,
    /// Any status this service does not act on (e.g. `requires_action`).
    #[serde(other)]
    Other,
}

/// What the gateway reports for a processed charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeResult {
    pub payment_intent_id: String,
    pub status: ChargeStatus,
}

/// External payment processor.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, request: &ChargeRequest) -> Result<ChargeResult, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_parses_gateway_wire_shape() {
        let result: ChargeResult = serde_json::from_str(
            r#"{"paymentIntentId":"pi_123","status":"succeeded","amount":500}"#,
        )
        .unwrap();
        assert_eq!(result.payment_intent_id, "pi_123");
        assert_eq!(result.status, ChargeStatus::Succeeded);
    }

    #[test]
    fn unknown_status_is_other() {
        let result: ChargeResult =
            serde_json::from_str(r#"{"paymentIntentId":"pi_1","status":"requires_action"}"#)
                .unwrap();
        assert_eq!(result.status, ChargeStatus::Other);
    }

    #[test]
    fn converts_into_core_error() {
        let err: CoreError = GatewayError::HttpStatus(502).into();
        assert_eq!(
            err.to_string(),
            "Payment gateway error: Gateway returned HTTP 502"
        );
    }
}
