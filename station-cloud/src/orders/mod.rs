//! Order lifecycle and payment reconciliation

pub mod lifecycle;
pub mod payment;
pub mod reference;

#[cfg(test)]
pub(crate) mod testkit;

use shared::error::{AppError, ErrorCode};
use shared::models::Order;

pub use lifecycle::{
    OrderQuery, OrderReview, PrintUpdate, create_order, get_order, list_orders, order_stats,
    review_order, update_print_status,
};
pub use payment::{
    CheckoutSession, InitializePayment, PaymentStatusView, VerifiedPayment, initialize_payment,
    payment_status, verify_payment,
};

pub(crate) fn not_pending(order: &Order) -> AppError {
    AppError::new(ErrorCode::OrderNotPending)
        .with_detail("order", order.id.clone())
        .with_detail("status", order.order_status.as_db())
}
