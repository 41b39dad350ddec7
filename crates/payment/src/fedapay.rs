//! REST API client for FedaPay.
//!
//! Transactions are created with `POST /v1/transactions`, tokenised with
//! `POST /v1/transactions/{id}/token` and read back with
//! `GET /v1/transactions/{id}`. Transaction payloads are wrapped in a
//! `"v1/transaction"` object.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::FedaPayConfig;
use crate::gateway::{GatewayTransaction, NewPayment, PaymentError, PaymentGateway, PaymentLink};

/// HTTP client for the FedaPay API.
pub struct FedaPayClient {
    client: reqwest::Client,
    config: FedaPayConfig,
}

#[derive(Debug, Deserialize)]
struct TransactionEnvelope {
    #[serde(rename = "v1/transaction")]
    transaction: GatewayTransaction,
}

impl FedaPayClient {
    pub fn new(config: FedaPayConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: FedaPayConfig) -> Self {
        Self { client, config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, otherwise return a
    /// [`PaymentError::ApiError`] carrying the status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, PaymentError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(PaymentError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, PaymentError> {
        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;
        decode(&body)
    }
}

/// Decode a JSON body, mapping failures to [`PaymentError::Decode`].
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, PaymentError> {
    serde_json::from_str(body).map_err(|e| PaymentError::Decode(e.to_string()))
}

/// Request body for `POST /v1/transactions`.
fn transaction_body(payment: &NewPayment) -> serde_json::Value {
    serde_json::json!({
        "description": payment.description,
        "amount": payment.amount,
        "currency": { "iso": payment.currency },
        "callback_url": payment.callback_url,
        "customer": payment.customer,
    })
}

#[async_trait]
impl PaymentGateway for FedaPayClient {
    async fn create_transaction(
        &self,
        payment: &NewPayment,
    ) -> Result<GatewayTransaction, PaymentError> {
        let response = self
            .client
            .post(self.url("transactions"))
            .bearer_auth(&self.config.secret_key)
            .json(&transaction_body(payment))
            .send()
            .await?;

        let envelope: TransactionEnvelope = Self::parse_response(response).await?;
        tracing::info!(
            transaction_id = envelope.transaction.id,
            status = %envelope.transaction.status,
            "Gateway transaction created"
        );
        Ok(envelope.transaction)
    }

    async fn generate_token(&self, transaction_id: i64) -> Result<PaymentLink, PaymentError> {
        let response = self
            .client
            .post(self.url(&format!("transactions/{transaction_id}/token")))
            .bearer_auth(&self.config.secret_key)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn retrieve(&self, transaction_id: i64) -> Result<GatewayTransaction, PaymentError> {
        let response = self
            .client
            .get(self.url(&format!("transactions/{transaction_id}")))
            .bearer_auth(&self.config.secret_key)
            .send()
            .await?;

        let envelope: TransactionEnvelope = Self::parse_response(response).await?;
        Ok(envelope.transaction)
    }
}
