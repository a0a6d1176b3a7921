//! Payment gateway reached over HTTP.
//!
//! POSTs a JSON [`ChargeRequest`] to `PAYMENT_GATEWAY_URL` and expects a
//! [`ChargeResult`] back.

use std::time::Duration;

use async_trait::async_trait;

use crate::gateway::{ChargeRequest, ChargeResult, GatewayError, PaymentGateway};

/// Default request timeout for a charge call.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Configuration for [`HttpPaymentGateway`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub url: String,
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Load from environment variables.
    ///
    /// Returns `Ok(None)` when `PAYMENT_GATEWAY_URL` is not set, signalling
    /// that the simulated gateway should be used.
    ///
    /// | Variable                       | Required | Default |
    /// |--------------------------------|----------|---------|
    /// | `PAYMENT_GATEWAY_URL`          | yes      |         |
    /// | `PAYMENT_GATEWAY_TIMEOUT_SECS` | no       | `15`    |
    pub fn from_env() -> Result<Option<Self>, String> {
        let Ok(url) = std::env::var("PAYMENT_GATEWAY_URL") else {
            return Ok(None);
        };
        let timeout_secs = match std::env::var("PAYMENT_GATEWAY_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                format!("PAYMENT_GATEWAY_TIMEOUT_SECS must be a valid u64, got '{raw}'")
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        Ok(Some(Self {
            url,
            timeout: Duration::from_secs(timeout_secs),
        }))
    }
}

/// Charges cards through a remote gateway endpoint.
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    url: String,
}

impl HttpPaymentGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn charge(&self, request: &ChargeRequest) -> Result<ChargeResult, GatewayError> {
        let response = self.client.post(&self.url).json(request).send().await?;
        if !response.status().is_success() {
            return Err(GatewayError::HttpStatus(response.status().as_u16()));
        }
        Ok(response.json::<ChargeResult>().await?)
    }
}
