//! Application state for station-cloud

use std::sync::Arc;

use rust_decimal::Decimal;
use shared::models::OrderType;
use sqlx::PgPool;

use crate::config::Config;
use crate::db::{BoxError, OrderStore, PgStore};
use crate::payment::{ChapaClient, PaymentGateway};

/// Default prices per order type
#[derive(Debug, Clone, Copy)]
pub struct Pricing {
    pub normal: Decimal,
    pub urgent: Decimal,
}

impl Pricing {
    pub fn price_for(&self, order_type: OrderType) -> Decimal {
        match order_type {
            OrderType::Normal => self.normal,
            OrderType::Urgent => self.urgent,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Order/citizen/user persistence
    pub store: Arc<dyn OrderStore>,
    /// Hosted-checkout payment gateway
    pub gateway: Arc<dyn PaymentGateway>,
    /// JWT secret for dashboard authentication
    pub jwt_secret: String,
    /// HMAC key of POST callbacks (None = callbacks are not signature-checked)
    pub webhook_secret: Option<String>,
    /// Public base URL of this service
    pub app_base_url: String,
    /// Currency sent to the gateway
    pub currency: String,
    pub pricing: Pricing,
}

impl AppState {
    /// Create a new AppState
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        let gateway = ChapaClient::new(
            &config.chapa_base_url,
            &config.chapa_secret_key,
            config.gateway_timeout,
        )?;

        Ok(Self::from_parts(
            Arc::new(PgStore::new(pool)),
            Arc::new(gateway),
            config,
        ))
    }

    /// Assemble state from already-built collaborators
    pub fn from_parts(
        store: Arc<dyn OrderStore>,
        gateway: Arc<dyn PaymentGateway>,
        config: &Config,
    ) -> Self {
        Self {
            store,
            gateway,
            jwt_secret: config.jwt_secret.clone(),
            webhook_secret: config.chapa_webhook_secret.clone(),
            app_base_url: config.app_base_url.clone(),
            currency: config.currency.clone(),
            pricing: Pricing {
                normal: config.normal_price,
                urgent: config.urgent_price,
            },
        }
    }

    /// Verification endpoint of a reference.
    ///
    /// Used as both the server-to-server callback (POST) and the browser
    /// return target (GET) so either path re-queries the gateway.
    pub fn verification_url(&self, tx_ref: &str) -> String {
        format!("{}/api/verify-payment/{tx_ref}", self.app_base_url)
    }
}
