//! Order management API
//!
//! - POST /api/orders                — create order
//! - GET  /api/orders                — paged listing
//! - GET  /api/orders/stats          — per-status counters
//! - GET  /api/orders/{id}           — single order
//! - POST /api/orders/{id}/review    — approve / reject
//! - POST /api/orders/{id}/print     — advance print flag

use axum::extract::{Extension, Json, Path, Query, State};
use serde::Serialize;
use shared::PaginatedResponse;
use shared::error::ApiResponse;
use shared::models::{Order, OrderCreate, OrderStats};

use super::ApiResult;
use crate::auth::Identity;
use crate::orders::{self, OrderQuery, OrderReview, PrintUpdate};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct OrderBody {
    pub order: Order,
}

#[derive(Debug, Serialize)]
pub struct StatsBody {
    pub stats: OrderStats,
}

pub async fn create_order(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<OrderCreate>,
) -> ApiResult<OrderBody> {
    let order = orders::create_order(&state, &identity, req).await?;
    Ok(ApiResponse::success_with_message(
        "Order created",
        OrderBody { order },
    ))
}

pub async fn list_orders(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<OrderQuery>,
) -> ApiResult<PaginatedResponse<Order>> {
    let page = orders::list_orders(&state, &identity, query).await?;
    Ok(ApiResponse::success(page))
}

pub async fn order_stats(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<StatsBody> {
    let stats = orders::order_stats(&state, &identity).await?;
    Ok(ApiResponse::success(StatsBody { stats }))
}

pub async fn get_order(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<OrderBody> {
    let order = orders::get_order(&state, &identity, &id).await?;
    Ok(ApiResponse::success(OrderBody { order }))
}

pub async fn review_order(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(review): Json<OrderReview>,
) -> ApiResult<OrderBody> {
    let order = orders::review_order(&state, &identity, &id, review).await?;
    Ok(ApiResponse::success_with_message(
        format!("Order {}", order.order_status.as_db().to_lowercase()),
        OrderBody { order },
    ))
}

pub async fn update_print_status(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(update): Json<PrintUpdate>,
) -> ApiResult<OrderBody> {
    let order = orders::update_print_status(&state, &identity, &id, update.print_status).await?;
    Ok(ApiResponse::success(OrderBody { order }))
}
