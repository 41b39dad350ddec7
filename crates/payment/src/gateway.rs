//! Gateway-neutral payment types and the [`PaymentGateway`] trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Errors from the payment gateway layer.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway returned a non-2xx status code.
    #[error("Payment gateway error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// The gateway answered 2xx with a body we could not interpret.
    #[error("Unexpected payment gateway response: {0}")]
    Decode(String),

    /// No gateway credentials are configured.
    #[error("Payment gateway is not configured")]
    NotConfigured,
}

/// The buyer as presented to the gateway.
#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    pub email: String,
    pub firstname: String,
}

/// A transaction to open on the gateway.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub description: String,
    /// Amount in the currency's smallest accepted unit.
    pub amount: i64,
    /// ISO 4217 code, e.g. `XOF`.
    pub currency: String,
    pub callback_url: String,
    pub customer: Customer,
}

/// A transaction as reported by the gateway.
///
/// `id` and `status` are what the server acts on; every other field the
/// gateway sends is kept in `details` so it can be echoed back to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GatewayTransaction {
    pub id: i64,
    pub status: String,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

/// Token and hosted checkout URL for a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentLink {
    pub token: String,
    pub url: String,
}

/// Operations the server needs from a hosted payment gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a new transaction.
    async fn create_transaction(&self, payment: &NewPayment)
        -> Result<GatewayTransaction, PaymentError>;

    /// Obtain the checkout link for an open transaction.
    async fn generate_token(&self, transaction_id: i64) -> Result<PaymentLink, PaymentError>;

    /// Fetch the current state of a transaction.
    async fn retrieve(&self, transaction_id: i64) -> Result<GatewayTransaction, PaymentError>;
}

/// Gateway used when no credentials are configured: every call fails with
/// [`PaymentError::NotConfigured`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledGateway;

#[async_trait]
impl PaymentGateway for DisabledGateway {
    async fn create_transaction(
        &self,
        _payment: &NewPayment,
    ) -> Result<GatewayTransaction, PaymentError> {
        Err(PaymentError::NotConfigured)
    }

    async fn generate_token(&self, _transaction_id: i64) -> Result<PaymentLink, PaymentError> {
        Err(PaymentError::NotConfigured)
    }

    async fn retrieve(&self, _transaction_id: i64) -> Result<GatewayTransaction, PaymentError> {
        Err(PaymentError::NotConfigured)
    }
}
