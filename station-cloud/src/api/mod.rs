//! HTTP API routes for station-cloud

pub mod health;
pub mod orders;
pub mod payment;
pub mod verify_payment;

use axum::routing::{get, post};
use axum::{Router, middleware};
use shared::error::{ApiResponse, AppError};
use tower_http::trace::TraceLayer;

use crate::auth::identity_middleware;
use crate::state::AppState;

/// Handler result: `{status:true, ...}` or an `AppError` envelope
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Dashboard API (JWT authenticated)
    let dashboard = Router::new()
        .route(
            "/api/orders",
            post(orders::create_order).get(orders::list_orders),
        )
        .route("/api/orders/stats", get(orders::order_stats))
        .route("/api/orders/{id}", get(orders::get_order))
        .route("/api/orders/{id}/review", post(orders::review_order))
        .route("/api/orders/{id}/print", post(orders::update_print_status))
        .route("/api/orders/{id}/payment", post(payment::initialize_payment))
        .route("/api/payment-status/{tx_ref}", get(payment::payment_status))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ));

    // Gateway redirect (GET) and server-to-server callback (POST, signed)
    let verification = Router::new().route(
        "/api/verify-payment/{tx_ref}",
        get(verify_payment::verify_redirect).post(verify_payment::verify_callback),
    );

    Router::new()
        .route("/health", get(health::health_check))
        .merge(dashboard)
        .merge(verification)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
