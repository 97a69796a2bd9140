//! Card payment processor client.

use std::fmt;

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A charge to submit, amounts in the currency's minor unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChargeRequest {
    pub amount: i64,
    pub currency: String,
    /// Card token from the client-side tokenizer.
    pub source: String,
    pub description: String,
    #[serde(skip)]
    pub idempotency_key: String,
}

/// A confirmed charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charge {
    pub id: String,
}

#[derive(Debug, Error)]
pub enum PaymentProcessorError {
    #[error("card declined: {0}")]
    Declined(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from payment processor: {0}")]
    UnexpectedResponse(String),
}

#[automock]
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Charge a card. Only an `Ok` means money moved.
    async fn charge(&self, request: ChargeRequest) -> Result<Charge, PaymentProcessorError>;
}

/// Connection details for the HTTP processor.
#[derive(Clone)]
pub struct PaymentProcessorConfig {
    /// Base URL, e.g. `"https://payments.example.com/v1"`.
    pub url: String,

    /// Secret API key sent as a bearer token.
    pub api_key: String,
}

impl fmt::Debug for PaymentProcessorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentProcessorConfig")
            .field("url", &self.url)
            .field("api_key", &"**redacted**")
            .finish()
    }
}

/// Processor reached over a JSON `POST {url}/charges`.
#[derive(Debug, Clone)]
pub struct HttpPaymentProcessor {
    config: PaymentProcessorConfig,
    http: Client,
}

impl HttpPaymentProcessor {
    #[must_use]
    pub fn new(config: PaymentProcessorConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl PaymentProcessor for HttpPaymentProcessor {
    #[tracing::instrument(
        name = "payments.processor.charge",
        skip(self, request),
        fields(amount = request.amount, currency = %request.currency),
        err
    )]
    async fn charge(&self, request: ChargeRequest) -> Result<Charge, PaymentProcessorError> {
        let url = format!("{}/charges", self.config.url.trim_end_matches('/'));

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header("Idempotency-Key", &request.idempotency_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        interpret_response(status, &text)
    }
}

#[derive(Debug, Deserialize)]
struct ChargeResponse {
    id: Option<String>,
    status: String,
    failure_message: Option<String>,
}

fn interpret_response(status: StatusCode, body: &str) -> Result<Charge, PaymentProcessorError> {
    let parsed = serde_json::from_str::<ChargeResponse>(body);

    match parsed {
        Ok(ChargeResponse {
            id: Some(id),
            status: charge_status,
            ..
        }) if status.is_success() && charge_status == "succeeded" => Ok(Charge { id }),
        Ok(ChargeResponse {
            status: charge_status,
            failure_message,
            ..
        }) if charge_status == "declined" || status == StatusCode::PAYMENT_REQUIRED => {
            Err(PaymentProcessorError::Declined(
                failure_message.unwrap_or_else(|| "no reason given".to_string()),
            ))
        }
        Ok(_) | Err(_) => Err(PaymentProcessorError::UnexpectedResponse(format!(
            "charge request returned {status}: {body}"
        ))),
    }
}
