//! Payment API (dashboard side)
//!
//! - POST /api/orders/{id}/payment      — start hosted checkout
//! - GET  /api/payment-status/{tx_ref}  — read-only status

use axum::extract::{Extension, Json, Path, State};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::error::ApiResponse;
use shared::models::OrderType;

use super::ApiResult;
use crate::auth::Identity;
use crate::orders::{self, CheckoutSession, InitializePayment, PaymentStatusView};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub citizen_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default)]
    pub order_type: OrderType,
}

pub async fn initialize_payment(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(order_id): Path<String>,
    Json(req): Json<PaymentRequest>,
) -> ApiResult<CheckoutSession> {
    let session = orders::initialize_payment(
        &state,
        &identity,
        InitializePayment {
            order_id,
            citizen_id: req.citizen_id,
            amount: req.amount,
            order_type: req.order_type,
        },
    )
    .await?;
    Ok(ApiResponse::success(session))
}

pub async fn payment_status(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(tx_ref): Path<String>,
) -> ApiResult<PaymentStatusView> {
    let view = orders::payment_status(&state, &identity, &tx_ref).await?;
    Ok(ApiResponse::success(view))
}
