//! Role Model

use serde::{Deserialize, Serialize};

/// Dashboard role of a user
///
/// Super roles operate across all stations; station roles are bound to
/// exactly one station.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    SuperPrinter,
    StationAdmin,
    StationRegistrar,
    StationPrinter,
}

impl Role {
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "SUPER_ADMIN" => Some(Self::SuperAdmin),
            "SUPER_PRINTER" => Some(Self::SuperPrinter),
            "STATION_ADMIN" => Some(Self::StationAdmin),
            "STATION_REGISTRAR" => Some(Self::StationRegistrar),
            "STATION_PRINTER" => Some(Self::StationPrinter),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::SuperPrinter => "SUPER_PRINTER",
            Self::StationAdmin => "STATION_ADMIN",
            Self::StationRegistrar => "STATION_REGISTRAR",
            Self::StationPrinter => "STATION_PRINTER",
        }
    }

    /// Cross-station role?
    pub fn is_super(&self) -> bool {
        matches!(self, Self::SuperAdmin | Self::SuperPrinter)
    }

    /// May create orders and start payments
    pub fn can_register(&self) -> bool {
        matches!(self, Self::StationRegistrar | Self::StationAdmin)
    }

    /// May approve or reject pending orders and release them for print
    pub fn can_review(&self) -> bool {
        matches!(self, Self::StationAdmin | Self::SuperAdmin)
    }

    /// May mark released orders as printed
    pub fn can_print(&self) -> bool {
        matches!(self, Self::StationPrinter | Self::SuperPrinter)
    }
}

/// User row as seen by the order service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub role: Role,
    /// None for super roles
    pub station_id: Option<String>,
}
