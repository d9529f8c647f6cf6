//! Coarse grouping of error codes
//!
//! The thousands digit of an [`ErrorCode`] names its group. Handlers use the
//! group to pick between "caller problem" and "our problem" responses
//! without listing individual codes.

use super::codes::ErrorCode;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    General,
    Auth,
    Permission,
    /// Station assignment and citizen lookups
    Station,
    Order,
    /// Failures talking to or confirmed by the payment gateway
    Payment,
    /// Database, configuration and anything unclassified
    System,
}

impl ErrorCategory {
    /// Server-side failure that should be logged and answered with a 5xx
    pub fn is_system(&self) -> bool {
        matches!(self, Self::System)
    }
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        match self.code() / 1000 {
            0 => ErrorCategory::General,
            1 => ErrorCategory::Auth,
            2 => ErrorCategory::Permission,
            3 => ErrorCategory::Station,
            4 => ErrorCategory::Order,
            5 => ErrorCategory::Payment,
            _ => ErrorCategory::System,
        }
    }
}
