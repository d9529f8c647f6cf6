//! Station scoping of authenticated callers

use shared::error::{AppError, ErrorCode};
use shared::models::{Order, Role};

use super::Identity;
use crate::db::OrderStore;
use crate::error::ServiceResult;

/// Caller resolved against the user store
///
/// The stored role wins over the token role so a demoted user loses access
/// before the token expires.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: String,
    pub role: Role,
    pub station_id: Option<String>,
}

impl Caller {
    /// Station filter for queries: None = all stations
    pub fn station_filter(&self) -> Option<&str> {
        if self.role.is_super() {
            None
        } else {
            self.station_id.as_deref()
        }
    }

    /// Station the caller acts for; super roles have none
    pub fn require_station(&self) -> Result<&str, AppError> {
        self.station_id
            .as_deref()
            .ok_or_else(|| AppError::new(ErrorCode::StationNotFound))
    }

    /// Whether `order` is visible to the caller
    pub fn can_see(&self, order: &Order) -> bool {
        self.role.is_super() || self.station_id.as_deref() == Some(order.station_id.as_str())
    }
}

/// Load the caller's user row.
///
/// Missing user → `unauthenticated`; a station role without a station →
/// `station_not_found`.
pub async fn resolve_caller(store: &dyn OrderStore, identity: &Identity) -> ServiceResult<Caller> {
    let user = store
        .find_user(&identity.user_id)
        .await?
        .ok_or_else(AppError::not_authenticated)?;

    if !user.role.is_super() && user.station_id.is_none() {
        tracing::warn!(user_id = %user.id, role = user.role.as_db(), "Station user without station");
        return Err(AppError::new(ErrorCode::StationNotFound).into());
    }

    Ok(Caller {
        user_id: user.id,
        role: user.role,
        station_id: user.station_id,
    })
}
