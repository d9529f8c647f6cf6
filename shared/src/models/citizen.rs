//! Citizen Model

use serde::{Deserialize, Serialize};

/// Citizen registered at a station
///
/// Read-only for the order service; `is_verified` gates order creation and
/// `phone_number` is forwarded to the payment gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Citizen {
    pub id: String,
    pub station_id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub is_verified: bool,
}
