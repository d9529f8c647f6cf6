//! station-cloud — ID-card order service
//!
//! Registrars create orders for verified citizens, pay for them through a
//! hosted Chapa checkout, and admins/printers carry approved orders through
//! the print workflow. Payment verification re-queries the gateway and only
//! then approves the order.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod orders;
pub mod payment;
pub mod state;

pub use config::Config;
pub use state::AppState;
