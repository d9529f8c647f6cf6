//! Chapa integration via REST API (no SDK dependency)

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{
    CheckoutData, GatewayEnvelope, GatewayError, InitializeRequest, PaymentGateway, VerifyData,
    envelope_message,
};

pub const METHOD_NAME: &str = "chapa";

/// Chapa HTTP client
#[derive(Clone)]
pub struct ChapaClient {
    http: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl ChapaClient {
    pub fn new(
        base_url: impl Into<String>,
        secret_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        })
    }

    /// Read the body as text and classify it.
    ///
    /// Non-2xx responses become [`GatewayError::Http`] regardless of body.
    async fn read_envelope<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
        op: &'static str,
    ) -> Result<GatewayEnvelope<T>, GatewayError> {
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body)
                .map(|v| envelope_message(&v))
                .unwrap_or_else(|_| body.chars().take(200).collect());
            tracing::warn!(op, status = status.as_u16(), %message, "Chapa returned error status");
            return Err(GatewayError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let envelope = GatewayEnvelope::from_body(&body);
        if let GatewayEnvelope::Unexpected(raw) = &envelope {
            tracing::warn!(op, body = %raw, "Unexpected Chapa response shape");
        }
        Ok(envelope)
    }
}

#[async_trait]
impl PaymentGateway for ChapaClient {
    fn name(&self) -> &'static str {
        METHOD_NAME
    }

    async fn initialize(
        &self,
        request: &InitializeRequest,
    ) -> Result<GatewayEnvelope<CheckoutData>, GatewayError> {
        tracing::debug!(tx_ref = %request.tx_ref, "Initializing Chapa transaction");
        let resp = self
            .http
            .post(format!("{}/transaction/initialize", self.base_url))
            .bearer_auth(&self.secret_key)
            .json(request)
            .send()
            .await?;
        self.read_envelope(resp, "initialize").await
    }

    async fn verify(&self, tx_ref: &str) -> Result<GatewayEnvelope<VerifyData>, GatewayError> {
        tracing::debug!(tx_ref, "Verifying Chapa transaction");
        let resp = self
            .http
            .get(format!("{}/transaction/verify/{tx_ref}", self.base_url))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;
        self.read_envelope(resp, "verify").await
    }
}
