//! PostgreSQL implementation of [`OrderStore`]

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::models::{
    Citizen, Order, OrderStats, OrderStatus, OrderType, PrintStatus, Role, User,
};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{BoxError, OrderFilter, OrderStore, PaymentStamp, SortOrder, StoreResult};

const ORDER_COLUMNS: &str = "id, order_number, order_type, order_status, payment_method, \
     payment_reference, amount, print_status, printer_id, citizen_id, station_id, \
     registrar_id, created_at, updated_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: String,
    order_number: String,
    order_type: String,
    order_status: String,
    payment_method: Option<String>,
    payment_reference: Option<String>,
    amount: Decimal,
    print_status: String,
    printer_id: Option<String>,
    citizen_id: String,
    station_id: String,
    registrar_id: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<OrderRow> for Order {
    type Error = BoxError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order {
            order_type: OrderType::from_db(&row.order_type)
                .ok_or_else(|| format!("Unknown order_type '{}'", row.order_type))?,
            order_status: OrderStatus::from_db(&row.order_status)
                .ok_or_else(|| format!("Unknown order_status '{}'", row.order_status))?,
            print_status: PrintStatus::from_db(&row.print_status)
                .ok_or_else(|| format!("Unknown print_status '{}'", row.print_status))?,
            id: row.id,
            order_number: row.order_number,
            payment_method: row.payment_method,
            payment_reference: row.payment_reference,
            amount: row.amount,
            printer_id: row.printer_id,
            citizen_id: row.citizen_id,
            station_id: row.station_id,
            registrar_id: row.registrar_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    role: String,
    station_id: Option<String>,
}

/// `%term%` with LIKE metacharacters in `term` matched literally
fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Append the shared WHERE clause of list/count queries
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &OrderFilter) {
    qb.push(" WHERE TRUE");
    if let Some(station_id) = &filter.station_id {
        qb.push(" AND station_id = ").push_bind(station_id.clone());
    }
    if let Some(status) = filter.status {
        qb.push(" AND order_status = ").push_bind(status.as_db());
    }
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND order_number ILIKE ")
            .push_bind(contains_pattern(search));
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn find_user(&self, user_id: &str) -> StoreResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, username, role, station_id FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|r| -> StoreResult<User> {
            let role = Role::from_db(&r.role).ok_or_else(|| format!("Unknown role '{}'", r.role))?;
            Ok(User {
                id: r.id,
                username: r.username,
                role,
                station_id: r.station_id,
            })
        })
        .transpose()
    }

    async fn find_citizen(&self, citizen_id: &str) -> StoreResult<Option<Citizen>> {
        let citizen = sqlx::query_as::<_, Citizen>(
            "SELECT id, station_id, first_name, last_name, phone_number, is_verified
             FROM citizens WHERE id = $1",
        )
        .bind(citizen_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(citizen)
    }

    async fn insert_order(&self, order: &Order) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO orders (id, order_number, order_type, order_status, payment_method,
                payment_reference, amount, print_status, printer_id, citizen_id, station_id,
                registrar_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(&order.id)
        .bind(&order.order_number)
        .bind(order.order_type.as_db())
        .bind(order.order_status.as_db())
        .bind(&order.payment_method)
        .bind(&order.payment_reference)
        .bind(order.amount)
        .bind(order.print_status.as_db())
        .bind(&order.printer_id)
        .bind(&order.citizen_id)
        .bind(&order.station_id)
        .bind(&order.registrar_id)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_order(&self, order_id: &str) -> StoreResult<Option<Order>> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
                .bind(order_id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(Order::try_from).transpose()
    }

    async fn find_order_by_reference(&self, reference: &str) -> StoreResult<Option<Order>> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE payment_reference = $1"
        ))
        .bind(reference)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Order::try_from).transpose()
    }

    async fn reference_exists(&self, reference: &str) -> StoreResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM orders WHERE payment_reference = $1)")
                .bind(reference)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn stamp_payment(&self, stamp: &PaymentStamp<'_>) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE orders
             SET payment_reference = $2, amount = $3, payment_method = $4, updated_at = $5
             WHERE id = $1 AND order_status = 'PENDING'",
        )
        .bind(stamp.order_id)
        .bind(stamp.reference)
        .bind(stamp.amount)
        .bind(stamp.method)
        .bind(stamp.now)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn transition_status(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
        payment_method: Option<&str>,
        now: i64,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE orders
             SET order_status = $3, payment_method = COALESCE($4, payment_method), updated_at = $5
             WHERE id = $1 AND order_status = $2",
        )
        .bind(order_id)
        .bind(from.as_db())
        .bind(to.as_db())
        .bind(payment_method)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn transition_print(
        &self,
        order_id: &str,
        from: PrintStatus,
        to: PrintStatus,
        printer_id: &str,
        now: i64,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE orders
             SET print_status = $3, printer_id = $4, updated_at = $5
             WHERE id = $1 AND print_status = $2 AND order_status = 'APPROVED'",
        )
        .bind(order_id)
        .bind(from.as_db())
        .bind(to.as_db())
        .bind(printer_id)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn list_orders(&self, filter: &OrderFilter) -> StoreResult<(Vec<Order>, u64)> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM orders");
        push_filter(&mut count_qb, filter);
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {ORDER_COLUMNS} FROM orders"));
        push_filter(&mut qb, filter);
        qb.push(match filter.sort {
            SortOrder::Asc => " ORDER BY created_at ASC, id ASC",
            SortOrder::Desc => " ORDER BY created_at DESC, id DESC",
        });
        qb.push(" LIMIT ")
            .push_bind(i64::from(filter.limit))
            .push(" OFFSET ")
            .push_bind(i64::from(filter.offset));

        let rows: Vec<OrderRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        let orders = rows
            .into_iter()
            .map(Order::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((orders, total.max(0) as u64))
    }

    async fn order_stats(&self, station_id: Option<&str>) -> StoreResult<OrderStats> {
        let (pending, approved, rejected, printed): (i64, i64, i64, i64) = sqlx::query_as(
            "SELECT
                COUNT(*) FILTER (WHERE order_status = 'PENDING'),
                COUNT(*) FILTER (WHERE order_status = 'APPROVED'),
                COUNT(*) FILTER (WHERE order_status = 'REJECTED'),
                COUNT(*) FILTER (WHERE print_status = 'PRINTED')
             FROM orders
             WHERE ($1::TEXT IS NULL OR station_id = $1)",
        )
        .bind(station_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(OrderStats {
            pending,
            approved,
            rejected,
            printed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("ORD-12"), "%ORD-12%");
        assert_eq!(contains_pattern("50%"), r"%50\%%");
        assert_eq!(contains_pattern("a_b"), r"%a\_b%");
        assert_eq!(contains_pattern(r"c:\x"), r"%c:\\x%");
    }
}
