//! Payment provider API client.
//!
//! Two responsibilities: creating provider-side orders (amounts converted to
//! integer minor units) and verifying the HMAC-SHA256 signature the provider
//! sends back after the shopper completes payment. Verification is
//! constant-time via the `hmac` crate.

use hmac::{Hmac, Mac};
use reqwest::Client;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::config::PaymentConfig;

type HmacSha256 = Hmac<Sha256>;

/// Errors that can occur when interacting with the payment provider.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// An amount could not be represented in minor units.
    #[error("invalid amount: {0}")]
    InvalidAmount(Decimal),
}

/// A provider-side order awaiting payment.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteOrder {
    /// Provider order id, echoed back in the signed callback.
    pub id: String,
    /// Amount in minor units.
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
}

#[derive(Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    // Capture immediately on authorization.
    payment_capture: u8,
}

/// Payment provider API client.
#[derive(Clone)]
pub struct PaymentClient {
    client: Client,
    api_url: String,
    key_id: String,
    key_secret: SecretString,
}

impl PaymentClient {
    /// Create a new payment client.
    #[must_use]
    pub fn new(config: &PaymentConfig) -> Self {
        Self {
            client: Client::new(),
            api_url: config.api_url.clone(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
        }
    }

    /// The public key id, safe to hand to the browser checkout widget.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Create a provider-side order for the given amount.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::InvalidAmount` if the amount doesn't convert to
    /// whole minor units, or an HTTP/API error from the provider.
    pub async fn create_order(
        &self,
        amount: Decimal,
        currency: &str,
        receipt: &str,
    ) -> Result<RemoteOrder, PaymentError> {
        let body = CreateOrderBody {
            amount: to_minor_units(amount)?,
            currency,
            receipt,
            payment_capture: 1,
        };

        let response = self
            .client
            .post(format!("{}/orders", self.api_url))
            .basic_auth(&self.key_id, Some(self.key_secret.expose_secret()))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// Verify the signature from a completed-payment callback.
    ///
    /// The provider signs `"{order_id}|{payment_id}"` with the key secret;
    /// `signature` is the hex-encoded digest.
    #[must_use]
    pub fn signature_matches(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        verify_signature(
            self.key_secret.expose_secret().as_bytes(),
            order_id,
            payment_id,
            signature,
        )
    }
}

/// Convert a decimal currency amount to integer minor units (cents).
fn to_minor_units(amount: Decimal) -> Result<i64, PaymentError> {
    let minor = amount * Decimal::ONE_HUNDRED;
    if minor.fract() != Decimal::ZERO {
        return Err(PaymentError::InvalidAmount(amount));
    }
    minor.to_i64().ok_or(PaymentError::InvalidAmount(amount))
}

fn verify_signature(secret: &[u8], order_id: &str, payment_id: &str, signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature) else {
        return false;
    };
    // HMAC accepts keys of any length.
    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(format!("{order_id}|{payment_id}").as_bytes());
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sign(secret: &[u8], payload: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret).unwrap();
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_valid_signature_matches() {
        let secret = b"k9Qw3ZpL7vXr2TnB";
        let signature = sign(secret, "order_abc|pay_123");
        assert!(verify_signature(secret, "order_abc", "pay_123", &signature));
    }

    #[test]
    fn test_tampered_payment_id_fails() {
        let secret = b"k9Qw3ZpL7vXr2TnB";
        let signature = sign(secret, "order_abc|pay_123");
        assert!(!verify_signature(secret, "order_abc", "pay_999", &signature));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let signature = sign(b"first-key", "order_abc|pay_123");
        assert!(!verify_signature(
            b"second-key",
            "order_abc",
            "pay_123",
            &signature
        ));
    }

    #[test]
    fn test_non_hex_signature_fails() {
        assert!(!verify_signature(
            b"key",
            "order_abc",
            "pay_123",
            "not hex at all"
        ));
    }

    #[test]
    fn test_to_minor_units() {
        assert_eq!(to_minor_units("49.19".parse().unwrap()).unwrap(), 4919);
        assert_eq!(to_minor_units("5.00".parse().unwrap()).unwrap(), 500);
        // Sub-cent amounts are rejected rather than silently rounded.
        assert!(to_minor_units("1.005".parse().unwrap()).is_err());
    }
}
