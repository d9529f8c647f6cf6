//! Authentication and station scoping

pub mod jwt;
pub mod scope;

pub use jwt::{Identity, create_token, identity_middleware};
pub use scope::{Caller, resolve_caller};
