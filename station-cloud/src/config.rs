//! Service configuration

use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;

use crate::db::BoxError;

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Chapa API base URL (no trailing slash)
    pub chapa_base_url: String,
    /// Chapa secret key (Bearer token)
    pub chapa_secret_key: String,
    /// Chapa encryption key (reserved for inline card flows)
    pub chapa_encryption_key: Option<String>,
    /// HMAC key of server-to-server callbacks
    pub chapa_webhook_secret: Option<String>,
    /// Public base URL of this service (gateway callback and browser return)
    pub app_base_url: String,
    /// JWT secret for dashboard authentication
    pub jwt_secret: String,
    /// Timeout of every outbound gateway call
    pub gateway_timeout: Duration,
    /// ISO currency sent to the gateway
    pub currency: String,
    /// Default price of a NORMAL order
    pub normal_price: Decimal,
    /// Default price of an URGENT order
    pub urgent_price: Decimal,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    fn parse_or<T: FromStr>(name: &str, default: T) -> Result<T, BoxError> {
        match std::env::var(name) {
            Ok(v) if !v.is_empty() => v
                .parse()
                .map_err(|_| format!("{name} has an invalid value '{v}'").into()),
            _ => Ok(default),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let chapa_webhook_secret = std::env::var("CHAPA_WEBHOOK_SECRET")
            .ok()
            .filter(|s| !s.is_empty());
        if chapa_webhook_secret.is_none() && environment != "development" {
            return Err(
                format!("CHAPA_WEBHOOK_SECRET must be set in {environment} environment").into(),
            );
        }

        let http_port: u16 = Self::parse_or("HTTP_PORT", 8080)?;

        let normal_price = Self::parse_or("NORMAL_ORDER_PRICE", Decimal::from(300))?;
        let urgent_price = Self::parse_or("URGENT_ORDER_PRICE", Decimal::from(600))?;
        if normal_price <= Decimal::ZERO || urgent_price <= Decimal::ZERO {
            return Err("Order prices must be positive".into());
        }

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port,
            environment: environment.clone(),
            chapa_base_url: std::env::var("CHAPA_BASE_URL")
                .unwrap_or_else(|_| "https://api.chapa.co/v1".into())
                .trim_end_matches('/')
                .to_string(),
            chapa_secret_key: Self::require_secret("CHAPA_SECRET_KEY", &environment)?,
            chapa_encryption_key: std::env::var("CHAPA_ENCRYPTION_KEY")
                .ok()
                .filter(|s| !s.is_empty()),
            chapa_webhook_secret,
            app_base_url: std::env::var("APP_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{http_port}"))
                .trim_end_matches('/')
                .to_string(),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            gateway_timeout: Duration::from_secs(Self::parse_or("GATEWAY_TIMEOUT_SECS", 20)?),
            currency: std::env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "ETB".into()),
            normal_price,
            urgent_price,
        })
    }
}

#[cfg(test)]
impl Config {
    pub(crate) fn for_tests() -> Self {
        Self {
            database_url: "postgres://unused".into(),
            http_port: 0,
            environment: "development".into(),
            chapa_base_url: "http://127.0.0.1:9".into(),
            chapa_secret_key: "CHASECK_TEST-key".into(),
            chapa_encryption_key: None,
            chapa_webhook_secret: Some("whsec-test".into()),
            app_base_url: "https://app.test".into(),
            jwt_secret: "jwt-test-secret".into(),
            gateway_timeout: Duration::from_secs(5),
            currency: "ETB".into(),
            normal_price: Decimal::from(300),
            urgent_price: Decimal::from(600),
        }
    }
}
