//! Unified error system for the station service
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes, each with a wire `cause`
//! - [`ErrorCategory`]: Group of a code (thousands digit)
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified `{status, cause, message, ...}` envelope
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Station / citizen errors
//! - 4xxx: Order errors
//! - 5xxx: Payment gateway errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::OrderNotFound);
//! assert_eq!(err.cause(), "order_not_found");
//!
//! let err = AppError::validation("Amount must be positive")
//!     .with_detail("field", "amount");
//!
//! let response = ApiResponse::<()>::error(&err);
//! assert!(!response.status);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
