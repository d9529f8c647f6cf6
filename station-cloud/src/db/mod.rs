//! Database access layer
//!
//! [`OrderStore`] is the data-access contract of the order service. Every
//! state-changing write is conditional on the source state and reports
//! whether it applied, so concurrent duplicate transitions become no-ops.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::models::{Citizen, Order, OrderStats, OrderStatus, PrintStatus, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type StoreResult<T> = Result<T, BoxError>;

/// Payment binding written right before the gateway is called
#[derive(Debug, Clone)]
pub struct PaymentStamp<'a> {
    pub order_id: &'a str,
    pub reference: &'a str,
    pub amount: Decimal,
    pub method: &'a str,
    pub now: i64,
}

/// Sort direction on `created_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Listing filter
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// None = all stations (super roles)
    pub station_id: Option<String>,
    pub status: Option<OrderStatus>,
    /// Substring match on `order_number`
    pub search: Option<String>,
    pub sort: SortOrder,
    pub limit: u32,
    pub offset: u32,
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn find_user(&self, user_id: &str) -> StoreResult<Option<User>>;

    async fn find_citizen(&self, citizen_id: &str) -> StoreResult<Option<Citizen>>;

    async fn insert_order(&self, order: &Order) -> StoreResult<()>;

    async fn find_order(&self, order_id: &str) -> StoreResult<Option<Order>>;

    async fn find_order_by_reference(&self, reference: &str) -> StoreResult<Option<Order>>;

    async fn reference_exists(&self, reference: &str) -> StoreResult<bool>;

    /// Bind reference, amount and method to a PENDING order.
    ///
    /// Returns `false` when the order is missing or no longer PENDING.
    async fn stamp_payment(&self, stamp: &PaymentStamp<'_>) -> StoreResult<bool>;

    /// `UPDATE ... SET order_status = to WHERE order_status = from`
    async fn transition_status(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
        payment_method: Option<&str>,
        now: i64,
    ) -> StoreResult<bool>;

    /// `UPDATE ... SET print_status = to WHERE print_status = from`
    async fn transition_print(
        &self,
        order_id: &str,
        from: PrintStatus,
        to: PrintStatus,
        printer_id: &str,
        now: i64,
    ) -> StoreResult<bool>;

    /// Page of orders plus the total matching count
    async fn list_orders(&self, filter: &OrderFilter) -> StoreResult<(Vec<Order>, u64)>;

    async fn order_stats(&self, station_id: Option<&str>) -> StoreResult<OrderStats>;
}
