//! Payment ledger vocabulary: statuses, card data, amount rules and the
//! notification text for completed payments.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{ProjectId, UserId};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Ledger status of a payment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(PaymentStatus::Completed),
            "failed" => Ok(PaymentStatus::Failed),
            other => Err(CoreError::Validation(format!(
                "Unknown payment status '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for PaymentStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Card data
// ---------------------------------------------------------------------------

/// Card details forwarded to the payment gateway. Never persisted.
///
/// `Debug` prints only the last four digits.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardData {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub cardholder_name: String,
}

impl CardData {
    /// Last four digits of the card number, ignoring separators.
    pub fn last4(&self) -> String {
        let digits: Vec<char> = self
            .card_number
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        let start = digits.len().saturating_sub(4);
        digits[start..].iter().collect()
    }
}

impl fmt::Debug for CardData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardData")
            .field("card_number", &format_args!("**** {}", self.last4()))
            .field("expiry_date", &"<redacted>")
            .field("cvv", &"<redacted>")
            .field("cardholder_name", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

/// A payment request before the gateway is called.
#[derive(Debug, Clone, Validate)]
pub struct PaymentDraft {
    #[validate(custom(function = "crate::types::validate_id"))]
    pub project_id: ProjectId,
    #[validate(custom(function = "crate::types::validate_id"))]
    pub payer_id: UserId,
    #[validate(custom(function = "crate::types::validate_id"))]
    pub recipient_id: UserId,
    /// Amount in minor units (cents).
    #[validate(range(min = 1, message = "amount must be positive"))]
    pub amount_cents: i64,
}

/// Format minor units as a dollar amount, e.g. `1999` → `$19.99`.
pub fn format_amount(amount_cents: i64) -> String {
    let sign = if amount_cents < 0 { "-" } else { "" };
    let abs = amount_cents.unsigned_abs();
    format!("{sign}${}.{:02}", abs / 100, abs % 100)
}

/// Notification text for a completed payment.
pub fn payment_notice(amount_cents: i64) -> String {
    format!(
        "Payment of {} has been processed for your project.",
        format_amount(amount_cents)
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
