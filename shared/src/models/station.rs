//! Station Model

use serde::{Deserialize, Serialize};

/// Registration station (tenant boundary)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: String,
    pub name: String,
    pub code: String,
}
