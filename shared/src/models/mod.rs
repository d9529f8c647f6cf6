//! Data models
//!
//! Shared between the station service and its dashboards (via API).
//! Plain DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`;
//! rows carrying enums are mapped by the service's store layer.
//! All IDs are opaque strings.

pub mod citizen;
pub mod order;
pub mod role;
pub mod station;

// Re-exports
pub use citizen::*;
pub use order::*;
pub use role::*;
pub use station::*;
