//! Payment gateway client and signature verification.
//!
//! The gateway follows the Razorpay-style flow: the server creates a
//! gateway order for the amount in minor units, the browser widget collects
//! payment against that order, and the gateway hands the browser a
//! `(order_id, payment_id, signature)` triple. The signature is an
//! HMAC-SHA256 of `"{order_id}|{payment_id}"` keyed with the key secret,
//! which the server recomputes before trusting the payment.
//!
//! # API Reference
//!
//! - Base URL: `https://api.razorpay.com/v1`
//! - Authentication: HTTP basic auth with `key_id:key_secret`

use std::sync::Arc;

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use velour_core::Currency;

use crate::config::GatewayConfig;

type HmacSha256 = Hmac<Sha256>;

/// Errors that can occur when interacting with the payment gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway returned an error response.
    #[error("gateway error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a gateway response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// An order created at the gateway, as returned to the checkout widget.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    /// Gateway-assigned order id (`order_...`).
    pub id: String,
    /// Amount in minor units (paise for INR).
    pub amount: i64,
    /// ISO currency code.
    pub currency: String,
}

#[derive(Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

/// Payment gateway API client.
#[derive(Clone)]
pub struct PaymentClient {
    inner: Arc<PaymentClientInner>,
}

struct PaymentClientInner {
    client: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: SecretString,
    currency: Currency,
}

impl PaymentClient {
    /// Create a new payment gateway client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            inner: Arc::new(PaymentClientInner {
                client,
                base_url: config.base_url.clone(),
                key_id: config.key_id.clone(),
                key_secret: config.key_secret.clone(),
                currency: config.currency,
            }),
        })
    }

    /// Public key id, handed to the browser widget.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.inner.key_id
    }

    /// Currency orders are created in.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.inner.currency
    }

    /// Create a gateway order for the given amount in minor units.
    ///
    /// `receipt` is our own order number, echoed back in gateway dashboards.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Api` if the gateway rejects the request.
    pub async fn create_order(
        &self,
        amount_minor: i64,
        receipt: &str,
    ) -> Result<GatewayOrder, GatewayError> {
        let url = format!("{}/orders", self.inner.base_url);
        let body = CreateOrderBody {
            amount: amount_minor,
            currency: self.inner.currency.code(),
            receipt,
        };

        let response = self
            .inner
            .client
            .post(&url)
            .basic_auth(
                &self.inner.key_id,
                Some(self.inner.key_secret.expose_secret()),
            )
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(format!("Failed to parse order response: {e}")))
    }

    /// Verify a payment signature from the checkout widget.
    ///
    /// The widget reports success for every completed interaction, so this
    /// check is the only thing standing between a forged callback and a
    /// paid order. Returns `true` only when the signature matches.
    #[must_use]
    pub fn verify_signature(
        &self,
        gateway_order_id: &str,
        gateway_payment_id: &str,
        signature: &str,
    ) -> bool {
        verify_payment_signature(
            gateway_order_id,
            gateway_payment_id,
            signature,
            self.inner.key_secret.expose_secret(),
        )
    }
}

impl std::fmt::Debug for PaymentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentClient")
            .field("base_url", &self.inner.base_url)
            .field("key_id", &self.inner.key_id)
            .finish_non_exhaustive()
    }
}

/// Verify an HMAC-SHA256 hex signature over `"{order_id}|{payment_id}"`.
fn verify_payment_signature(
    gateway_order_id: &str,
    gateway_payment_id: &str,
    signature: &str,
    key_secret: &str,
) -> bool {
    let Ok(provided) = hex::decode(signature) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(key_secret.as_bytes()) else {
        return false;
    };
    mac.update(gateway_order_id.as_bytes());
    mac.update(b"|");
    mac.update(gateway_payment_id.as_bytes());

    // verify_slice is constant-time
    mac.verify_slice(&provided).is_ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sign(order_id: &str, payment_id: &str, secret: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_valid_signature_verifies() {
        let sig = sign("order_abc", "pay_xyz", "secret");
        assert!(verify_payment_signature("order_abc", "pay_xyz", &sig, "secret"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let sig = sign("order_abc", "pay_xyz", "secret");
        assert!(!verify_payment_signature("order_abc", "pay_xyz", &sig, "other"));
    }

    #[test]
    fn test_tampered_payment_id_rejected() {
        let sig = sign("order_abc", "pay_xyz", "secret");
        assert!(!verify_payment_signature("order_abc", "pay_other", &sig, "secret"));
    }

    #[test]
    fn test_non_hex_signature_rejected() {
        assert!(!verify_payment_signature("order_abc", "pay_xyz", "not hex!", "secret"));
    }

    #[test]
    fn test_client_exposes_widget_fields() {
        let config = crate::config::GatewayConfig {
            base_url: "https://api.razorpay.com/v1".to_string(),
            key_id: "rzp_test_abc123".to_string(),
            key_secret: "a-key-secret".to_string().into(),
            currency: Currency::INR,
        };
        let client = PaymentClient::new(&config).unwrap();

        assert_eq!(client.key_id(), "rzp_test_abc123");
        assert_eq!(client.currency(), Currency::INR);
    }
}
