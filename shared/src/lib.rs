//! Shared types for the station ID-card service
//!
//! Domain models, error codes, the response envelope and small utilities
//! used by the service crate and its tests.

pub mod error;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use response::{PaginatedResponse, Pagination};
