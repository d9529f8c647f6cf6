//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound | Self::OrderNotFound | Self::CitizenNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::OrderNotPending | Self::InvalidPrintTransition => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }

            // 403 Forbidden
            Self::PermissionDenied | Self::StationNotFound => StatusCode::FORBIDDEN,

            // 502 Bad Gateway (upstream payment gateway misbehaved)
            Self::ChapaApiError | Self::ChapaInitFailed => StatusCode::BAD_GATEWAY,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError | Self::ConfigError | Self::Unknown => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (validation / verification failures)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
