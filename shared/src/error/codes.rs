//! Unified error codes for the station service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Station / citizen errors
//! - 4xxx: Order errors
//! - 5xxx: Payment gateway errors
//! - 9xxx: System errors
//!
//! Every code also carries a snake_case `cause` string. Clients key their
//! behaviour on the cause (`order_not_found`, `chapa_api_error`, ...); the
//! numeric value is kept for logs and dashboards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// Caller has no valid identity
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Role not allowed to perform the operation
    PermissionDenied = 2001,

    // ==================== 3xxx: Station ====================
    /// Caller has no station assignment
    StationNotFound = 3001,
    /// Citizen not found in the caller's station
    CitizenNotFound = 3101,
    /// Citizen has not been verified yet
    CitizenNotVerified = 3102,

    // ==================== 4xxx: Order ====================
    /// Order does not exist or is outside the caller's scope
    OrderNotFound = 4001,
    /// Order is no longer PENDING
    OrderNotPending = 4002,
    /// Print flag transition out of order
    InvalidPrintTransition = 4003,

    // ==================== 5xxx: Payment ====================
    /// Transport, timeout or non-2xx failure talking to the gateway
    ChapaApiError = 5001,
    /// Gateway reachable but refused to initialize the transaction
    ChapaInitFailed = 5002,
    /// Gateway reachable but did not confirm the payment
    PaymentVerificationFailed = 5003,
    /// Inbound callback signature missing or wrong
    InvalidSignature = 5004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Machine-readable cause reported to callers
    pub const fn cause(&self) -> &'static str {
        match self {
            ErrorCode::Success => "success",
            ErrorCode::Unknown => "unknown",
            ErrorCode::ValidationFailed | ErrorCode::InvalidRequest => "validation_failed",
            ErrorCode::NotFound => "not_found",

            ErrorCode::NotAuthenticated | ErrorCode::TokenExpired | ErrorCode::TokenInvalid => {
                "unauthenticated"
            }

            ErrorCode::PermissionDenied => "permission_denied",

            ErrorCode::StationNotFound => "station_not_found",
            ErrorCode::CitizenNotFound => "citizen_not_found",
            ErrorCode::CitizenNotVerified => "citizen_not_verified",

            ErrorCode::OrderNotFound => "order_not_found",
            ErrorCode::OrderNotPending => "order_not_pending",
            ErrorCode::InvalidPrintTransition => "invalid_print_transition",

            ErrorCode::ChapaApiError => "chapa_api_error",
            ErrorCode::ChapaInitFailed => "chapa_init_failed",
            ErrorCode::PaymentVerificationFailed => "payment_verification_failed",
            ErrorCode::InvalidSignature => "invalid_signature",

            ErrorCode::InternalError | ErrorCode::DatabaseError | ErrorCode::ConfigError => {
                "internal_error"
            }
        }
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",

            // Station
            ErrorCode::StationNotFound => "No station is assigned to the current user",
            ErrorCode::CitizenNotFound => "Citizen not found",
            ErrorCode::CitizenNotVerified => "Citizen has not been verified",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderNotPending => "Order is no longer pending",
            ErrorCode::InvalidPrintTransition => "Invalid print status transition",

            // Payment
            ErrorCode::ChapaApiError => "Payment gateway request failed",
            ErrorCode::ChapaInitFailed => "Payment gateway failed to initialize the payment",
            ErrorCode::PaymentVerificationFailed => "Payment could not be verified",
            ErrorCode::InvalidSignature => "Invalid callback signature",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),

            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            2001 => Ok(ErrorCode::PermissionDenied),

            3001 => Ok(ErrorCode::StationNotFound),
            3101 => Ok(ErrorCode::CitizenNotFound),
            3102 => Ok(ErrorCode::CitizenNotVerified),

            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderNotPending),
            4003 => Ok(ErrorCode::InvalidPrintTransition),

            5001 => Ok(ErrorCode::ChapaApiError),
            5002 => Ok(ErrorCode::ChapaInitFailed),
            5003 => Ok(ErrorCode::PaymentVerificationFailed),
            5004 => Ok(ErrorCode::InvalidSignature),

            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::StationNotFound.code(), 3001);
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::ChapaApiError.code(), 5001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_causes_match_wire_vocabulary() {
        assert_eq!(ErrorCode::NotAuthenticated.cause(), "unauthenticated");
        assert_eq!(ErrorCode::TokenExpired.cause(), "unauthenticated");
        assert_eq!(ErrorCode::StationNotFound.cause(), "station_not_found");
        assert_eq!(ErrorCode::OrderNotFound.cause(), "order_not_found");
        assert_eq!(ErrorCode::ChapaApiError.cause(), "chapa_api_error");
        assert_eq!(ErrorCode::ChapaInitFailed.cause(), "chapa_init_failed");
        assert_eq!(
            ErrorCode::PaymentVerificationFailed.cause(),
            "payment_verification_failed"
        );
        assert_eq!(ErrorCode::DatabaseError.cause(), "internal_error");
        assert_eq!(ErrorCode::InternalError.cause(), "internal_error");
    }

    #[test]
    fn test_try_from_roundtrip_known_codes() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::NotAuthenticated,
            ErrorCode::PermissionDenied,
            ErrorCode::CitizenNotVerified,
            ErrorCode::OrderNotPending,
            ErrorCode::InvalidSignature,
            ErrorCode::ConfigError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
        assert_eq!(
            InvalidErrorCode(4242).to_string(),
            "invalid error code: 4242"
        );
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::OrderNotFound).unwrap();
        assert_eq!(json, "4001");
        let code: ErrorCode = serde_json::from_str("5003").unwrap();
        assert_eq!(code, ErrorCode::PaymentVerificationFailed);
        assert!(serde_json::from_str::<ErrorCode>("77").is_err());
    }
}
