//! In-process gateway used when no real processor is configured.
//!
//! Card details are checked locally (length, Luhn, expiry, CVV); valid
//! cards always succeed with a fresh `pi_<millis>_<random>` intent id.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use gigline_core::payment::CardData;
use rand::Rng;

use crate::gateway::{ChargeRequest, ChargeResult, ChargeStatus, GatewayError, PaymentGateway};

/// Simulated card processor.
#[derive(Debug, Default, Clone)]
pub struct SimulatedGateway {
    latency: Duration,
}

impl SimulatedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait this long before answering each charge.
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(&self, request: &ChargeRequest) -> Result<ChargeResult, GatewayError> {
        validate_card(&request.card)?;

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let result = ChargeResult {
            payment_intent_id: new_intent_id(),
            status: ChargeStatus::Succeeded,
        };
        tracing::info!(
            payment_intent_id = %result.payment_intent_id,
            amount_cents = request.amount_cents,
            card_last4 = %request.card.last4(),
            "Simulated charge succeeded"
        );
        Ok(result)
    }
}

/// Check card number, expiry and CVV.
pub fn validate_card(card: &CardData) -> Result<(), GatewayError> {
    let digits: Vec<u32> = card
        .card_number
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .map(|c| c.to_digit(10))
        .collect::<Option<_>>()
        .ok_or_else(|| GatewayError::InvalidCard("card number must be numeric".into()))?;

    if !(12..=19).contains(&digits.len()) {
        return Err(GatewayError::InvalidCard(
            "card number must have 12 to 19 digits".into(),
        ));
    }
    if !luhn_valid(&digits) {
        return Err(GatewayError::InvalidCard("card number checksum failed".into()));
    }

    check_expiry(&card.expiry_date)?;

    let cvv = card.cvv.trim();
    if !(3..=4).contains(&cvv.len()) || !cvv.chars().all(|c| c.is_ascii_digit()) {
        return Err(GatewayError::InvalidCard("CVV must be 3 or 4 digits".into()));
    }

    Ok(())
}

fn luhn_valid(digits: &[u32]) -> bool {
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

/// `MM/YY`, valid through the end of the given month.
fn check_expiry(expiry: &str) -> Result<(), GatewayError> {
    let invalid = || GatewayError::InvalidCard("expiry must be MM/YY".into());

    let (month, year) = expiry.trim().split_once('/').ok_or_else(invalid)?;
    if month.len() != 2 || year.len() != 2 {
        return Err(invalid());
    }
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }

    let today = Utc::now().date_naive();
    let expires = (2000 + year, month);
    if expires < (today.year(), today.month()) {
        return Err(GatewayError::Declined("card has expired".into()));
    }
    Ok(())
}

fn new_intent_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..9)
        .map(|_| std::char::from_digit(rng.random_range(0..36), 36).unwrap_or('0'))
        .collect();
    format!("pi_{}_{suffix}", Utc::now().timestamp_millis())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
