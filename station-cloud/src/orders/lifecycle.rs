//! Order creation, review, print workflow and queries

use rust_decimal::Decimal;
use serde::Deserialize;
use shared::PaginatedResponse;
use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderCreate, OrderStats, OrderStatus, PrintStatus};
use shared::util::{now_millis, order_number};

use crate::auth::{Caller, Identity, resolve_caller};
use crate::db::{OrderFilter, OrderStore, SortOrder};
use crate::error::ServiceResult;
use crate::orders::not_pending;
use crate::state::AppState;

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// Review decision on a PENDING order
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReview {
    pub status: OrderStatus,
    /// e.g. `CASH` for approvals paid at the counter
    #[serde(default)]
    pub payment_method: Option<String>,
}

/// Print flag update
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintUpdate {
    pub print_status: PrintStatus,
}

/// Listing query (`?page=1&per_page=20&status=PENDING&search=ORD-&sort=asc`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<OrderStatus>,
    pub search: Option<String>,
    pub sort: Option<SortOrder>,
}

impl OrderQuery {
    /// 1-based page and clamped page size
    fn paging(&self) -> (u32, u32) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        (page, per_page)
    }
}

/// Register a new PENDING order for a verified citizen of the caller's station
pub async fn create_order(
    state: &AppState,
    identity: &Identity,
    req: OrderCreate,
) -> ServiceResult<Order> {
    let store = state.store.as_ref();
    let caller = resolve_caller(store, identity).await?;
    if !caller.role.can_register() {
        return Err(AppError::permission_denied("Only registrars may create orders").into());
    }
    let station_id = caller.require_station()?;

    let citizen = store
        .find_citizen(&req.citizen_id)
        .await?
        .filter(|c| c.station_id == station_id)
        .ok_or_else(|| {
            AppError::new(ErrorCode::CitizenNotFound).with_detail("citizen", req.citizen_id.clone())
        })?;
    if !citizen.is_verified {
        return Err(AppError::new(ErrorCode::CitizenNotVerified)
            .with_detail("citizen", citizen.id)
            .into());
    }

    let amount = req
        .amount
        .unwrap_or_else(|| state.pricing.price_for(req.order_type));
    if amount <= Decimal::ZERO {
        return Err(AppError::validation("Amount must be positive")
            .with_detail("field", "amount")
            .into());
    }

    let now = now_millis();
    let order = Order {
        id: uuid::Uuid::new_v4().to_string(),
        order_number: order_number(),
        order_type: req.order_type,
        order_status: OrderStatus::Pending,
        payment_method: None,
        payment_reference: None,
        amount,
        print_status: PrintStatus::NotPrinted,
        printer_id: None,
        citizen_id: citizen.id,
        station_id: station_id.to_string(),
        registrar_id: Some(caller.user_id.clone()),
        created_at: now,
        updated_at: now,
    };
    store.insert_order(&order).await?;

    tracing::info!(
        order_id = %order.id,
        order_number = %order.order_number,
        station_id = %order.station_id,
        "Order created"
    );
    Ok(order)
}

/// Approve or reject a PENDING order by hand
pub async fn review_order(
    state: &AppState,
    identity: &Identity,
    order_id: &str,
    review: OrderReview,
) -> ServiceResult<Order> {
    let store = state.store.as_ref();
    let caller = resolve_caller(store, identity).await?;
    if !caller.role.can_review() {
        return Err(AppError::permission_denied("Only admins may review orders").into());
    }
    if review.status == OrderStatus::Pending {
        return Err(AppError::validation("Review status must be APPROVED or REJECTED").into());
    }

    let order = find_visible(store, &caller, order_id).await?;
    if !order.order_status.can_transition_to(review.status) {
        return Err(not_pending(&order).into());
    }

    let method = review.payment_method.as_deref().filter(|m| !m.is_empty());
    let applied = store
        .transition_status(
            &order.id,
            OrderStatus::Pending,
            review.status,
            method,
            now_millis(),
        )
        .await?;

    let current = find_visible(store, &caller, order_id).await?;
    if !applied {
        return Err(not_pending(&current).into());
    }

    tracing::info!(
        order_id = %current.id,
        status = current.order_status.as_db(),
        reviewer = %caller.user_id,
        "Order reviewed"
    );
    Ok(current)
}

/// Advance the print flag one step
///
/// `NOT_PRINTED → APPROVED_FOR_PRINT` is an admin action,
/// `APPROVED_FOR_PRINT → PRINTED` a printer action. Both need an APPROVED order.
pub async fn update_print_status(
    state: &AppState,
    identity: &Identity,
    order_id: &str,
    target: PrintStatus,
) -> ServiceResult<Order> {
    let store = state.store.as_ref();
    let caller = resolve_caller(store, identity).await?;

    let Some(from) = target.predecessor() else {
        return Err(AppError::with_message(
            ErrorCode::InvalidPrintTransition,
            "Print status cannot be reset",
        )
        .into());
    };
    let allowed = match target {
        PrintStatus::ApprovedForPrint => caller.role.can_review(),
        _ => caller.role.can_print(),
    };
    if !allowed {
        return Err(AppError::permission_denied(format!(
            "Role {} cannot set print status {}",
            caller.role.as_db(),
            target.as_db()
        ))
        .into());
    }

    let order = find_visible(store, &caller, order_id).await?;
    if order.order_status != OrderStatus::Approved {
        return Err(AppError::with_message(
            ErrorCode::InvalidPrintTransition,
            "Order must be approved before printing",
        )
        .with_detail("order", order.id)
        .into());
    }

    let applied = order.print_status == from
        && store
            .transition_print(&order.id, from, target, &caller.user_id, now_millis())
            .await?;
    if !applied {
        return Err(AppError::with_message(
            ErrorCode::InvalidPrintTransition,
            format!(
                "Cannot move print status to {} from {}",
                target.as_db(),
                order.print_status.as_db()
            ),
        )
        .into());
    }

    tracing::info!(
        order_id = %order.id,
        print_status = target.as_db(),
        printer_id = %caller.user_id,
        "Print status updated"
    );
    find_visible(store, &caller, order_id).await
}

pub async fn get_order(state: &AppState, identity: &Identity, order_id: &str) -> ServiceResult<Order> {
    let store = state.store.as_ref();
    let caller = resolve_caller(store, identity).await?;
    find_visible(store, &caller, order_id).await
}

pub async fn list_orders(
    state: &AppState,
    identity: &Identity,
    query: OrderQuery,
) -> ServiceResult<PaginatedResponse<Order>> {
    let store = state.store.as_ref();
    let caller = resolve_caller(store, identity).await?;
    let (page, per_page) = query.paging();

    let filter = OrderFilter {
        station_id: caller.station_filter().map(str::to_string),
        status: query.status,
        search: query.search.filter(|s| !s.trim().is_empty()),
        sort: query.sort.unwrap_or_default(),
        limit: per_page,
        offset: (page - 1).saturating_mul(per_page),
    };
    let (items, total) = store.list_orders(&filter).await?;
    Ok(PaginatedResponse::new(items, page, per_page, total))
}

pub async fn order_stats(state: &AppState, identity: &Identity) -> ServiceResult<OrderStats> {
    let store = state.store.as_ref();
    let caller = resolve_caller(store, identity).await?;
    Ok(store.order_stats(caller.station_filter()).await?)
}

/// Load an order the caller may see; others' orders look missing
async fn find_visible(
    store: &dyn OrderStore,
    caller: &Caller,
    order_id: &str,
) -> ServiceResult<Order> {
    Ok(store
        .find_order(order_id)
        .await?
        .filter(|o| caller.can_see(o))
        .ok_or_else(|| AppError::order_not_found(order_id))?)
}
