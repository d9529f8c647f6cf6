//! In-memory implementation of [`OrderStore`]
//!
//! Same semantics as the PostgreSQL store (conditional transitions, unique
//! payment references); used by tests and local development without a
//! database.

use std::collections::HashMap;

use async_trait::async_trait;
use shared::models::{Citizen, Order, OrderStats, OrderStatus, PrintStatus, User};
use tokio::sync::RwLock;

use super::{OrderFilter, OrderStore, PaymentStamp, SortOrder, StoreResult};

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    citizens: HashMap<String, Citizen>,
    orders: HashMap<String, Order>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, user: User) {
        self.tables.write().await.users.insert(user.id.clone(), user);
    }

    pub async fn add_citizen(&self, citizen: Citizen) {
        self.tables
            .write()
            .await
            .citizens
            .insert(citizen.id.clone(), citizen);
    }

    pub async fn order_count(&self) -> usize {
        self.tables.read().await.orders.len()
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn find_user(&self, user_id: &str) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(user_id).cloned())
    }

    async fn find_citizen(&self, citizen_id: &str) -> StoreResult<Option<Citizen>> {
        Ok(self.tables.read().await.citizens.get(citizen_id).cloned())
    }

    async fn insert_order(&self, order: &Order) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.orders.contains_key(&order.id) {
            return Err(format!("duplicate order id {}", order.id).into());
        }
        if let Some(reference) = &order.payment_reference
            && tables
                .orders
                .values()
                .any(|o| o.payment_reference.as_ref() == Some(reference))
        {
            return Err(format!("duplicate payment reference {reference}").into());
        }
        tables.orders.insert(order.id.clone(), order.clone());
        Ok(())
    }

    async fn find_order(&self, order_id: &str) -> StoreResult<Option<Order>> {
        Ok(self.tables.read().await.orders.get(order_id).cloned())
    }

    async fn find_order_by_reference(&self, reference: &str) -> StoreResult<Option<Order>> {
        Ok(self
            .tables
            .read()
            .await
            .orders
            .values()
            .find(|o| o.payment_reference.as_deref() == Some(reference))
            .cloned())
    }

    async fn reference_exists(&self, reference: &str) -> StoreResult<bool> {
        Ok(self
            .tables
            .read()
            .await
            .orders
            .values()
            .any(|o| o.payment_reference.as_deref() == Some(reference)))
    }

    async fn stamp_payment(&self, stamp: &PaymentStamp<'_>) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        // Mirrors the UNIQUE index on orders.payment_reference
        if tables.orders.values().any(|o| {
            o.id != stamp.order_id && o.payment_reference.as_deref() == Some(stamp.reference)
        }) {
            return Err(format!("duplicate payment reference {}", stamp.reference).into());
        }
        match tables.orders.get_mut(stamp.order_id) {
            Some(order) if order.order_status == OrderStatus::Pending => {
                order.payment_reference = Some(stamp.reference.to_string());
                order.amount = stamp.amount;
                order.payment_method = Some(stamp.method.to_string());
                order.updated_at = stamp.now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn transition_status(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
        payment_method: Option<&str>,
        now: i64,
    ) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.orders.get_mut(order_id) {
            Some(order) if order.order_status == from => {
                order.order_status = to;
                if let Some(method) = payment_method {
                    order.payment_method = Some(method.to_string());
                }
                order.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn transition_print(
        &self,
        order_id: &str,
        from: PrintStatus,
        to: PrintStatus,
        printer_id: &str,
        now: i64,
    ) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.orders.get_mut(order_id) {
            Some(order)
                if order.print_status == from && order.order_status == OrderStatus::Approved =>
            {
                order.print_status = to;
                order.printer_id = Some(printer_id.to_string());
                order.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_orders(&self, filter: &OrderFilter) -> StoreResult<(Vec<Order>, u64)> {
        let tables = self.tables.read().await;
        let search = filter
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut matching: Vec<&Order> = tables
            .orders
            .values()
            .filter(|o| {
                filter
                    .station_id
                    .as_ref()
                    .is_none_or(|station| &o.station_id == station)
            })
            .filter(|o| filter.status.is_none_or(|s| o.order_status == s))
            .filter(|o| {
                search
                    .as_ref()
                    .is_none_or(|s| o.order_number.to_lowercase().contains(s))
            })
            .collect();

        matching.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        if filter.sort == SortOrder::Desc {
            matching.reverse();
        }

        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn order_stats(&self, station_id: Option<&str>) -> StoreResult<OrderStats> {
        let tables = self.tables.read().await;
        let mut stats = OrderStats::default();
        for order in tables
            .orders
            .values()
            .filter(|o| station_id.is_none_or(|s| o.station_id == s))
        {
            match order.order_status {
                OrderStatus::Pending => stats.pending += 1,
                OrderStatus::Approved => stats.approved += 1,
                OrderStatus::Rejected => stats.rejected += 1,
            }
            if order.print_status == PrintStatus::Printed {
                stats.printed += 1;
            }
        }
        Ok(stats)
    }
}
