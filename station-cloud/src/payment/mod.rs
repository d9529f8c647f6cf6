//! Payment gateway integration
//!
//! The gateway answers every call with a JSON envelope
//! `{ "status": "...", "message": ..., "data": {...} }`. Responses are
//! classified into [`GatewayEnvelope`] before any business logic looks at
//! them, so a malformed payload can never be read as a confirmed payment.

pub mod chapa;
pub mod signature;

#[cfg(test)]
pub(crate) mod scripted;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::error::{AppError, ErrorCode};

pub use chapa::ChapaClient;

/// Classified gateway response body
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayEnvelope<T> {
    /// `status == "success"` with a well-formed `data` object
    Success(T),
    /// Any other `status` value
    Failed { message: String },
    /// Not JSON, no `status`, or `success` without usable `data`
    Unexpected(Value),
}

impl<T: DeserializeOwned> GatewayEnvelope<T> {
    pub fn from_value(value: Value) -> Self {
        match value.get("status").and_then(Value::as_str) {
            Some("success") => {
                let data = value
                    .get("data")
                    .filter(|d| d.is_object())
                    .map(|d| serde_json::from_value::<T>(d.clone()));
                match data {
                    Some(Ok(data)) => Self::Success(data),
                    _ => Self::Unexpected(value),
                }
            }
            Some(_) => Self::Failed {
                message: envelope_message(&value),
            },
            None => Self::Unexpected(value),
        }
    }

    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::from_value(value),
            Err(_) => Self::Unexpected(Value::String(body.to_string())),
        }
    }
}

/// Best-effort human message out of a gateway body
///
/// `message` is usually a string but validation failures carry an object of
/// field errors.
pub fn envelope_message(value: &Value) -> String {
    match value.get("message") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "No message from gateway".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Transport-level gateway failure
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway request timed out")]
    Timeout,

    #[error("gateway transport error: {0}")]
    Transport(String),

    #[error("gateway returned HTTP {status}: {message}")]
    Http { status: u16, message: String },
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Timeout
        } else {
            GatewayError::Transport(e.to_string())
        }
    }
}

impl From<GatewayError> for AppError {
    fn from(e: GatewayError) -> Self {
        let message = match &e {
            GatewayError::Timeout => "Chapa API did not respond in time".to_string(),
            GatewayError::Transport(msg) => format!("Could not reach Chapa API: {msg}"),
            GatewayError::Http { status: 401, .. } => {
                "Invalid Chapa API credentials. Please check your configuration.".to_string()
            }
            GatewayError::Http {
                status: 400,
                message,
            } => format!("Invalid request to Chapa API: {message}"),
            GatewayError::Http { status, message } => {
                format!("Chapa API error: HTTP {status}: {message}")
            }
        };
        AppError::with_message(ErrorCode::ChapaApiError, message)
    }
}

/// `customization` block shown on the hosted checkout page
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Customization {
    pub title: String,
    pub description: String,
}

/// `meta` block kept in the gateway's audit trail
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaymentMeta {
    pub order_id: String,
    pub citizen_id: String,
    pub order_type: String,
}

/// Body of `POST /transaction/initialize`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InitializeRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub tx_ref: String,
    pub callback_url: String,
    pub return_url: String,
    pub customization: Customization,
    pub meta: PaymentMeta,
}

/// `data` of a successful initialize response
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CheckoutData {
    pub checkout_url: String,
}

/// `data` of a successful verify response
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct VerifyData {
    /// Nested transaction status (`success`, `pending`, `failed`, ...)
    pub status: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub tx_ref: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
}

impl VerifyData {
    /// Only a terminal `success` sub-status confirms a payment
    pub fn is_confirmed(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Stored as the order's `payment_method`
    fn name(&self) -> &'static str;

    async fn initialize(
        &self,
        request: &InitializeRequest,
    ) -> Result<GatewayEnvelope<CheckoutData>, GatewayError>;

    async fn verify(&self, tx_ref: &str) -> Result<GatewayEnvelope<VerifyData>, GatewayError>;
}
