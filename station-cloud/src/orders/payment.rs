//! Payment initialization, verification and status
//!
//! Verification follows a pull model: whatever a caller claims, the order is
//! only approved after the gateway itself confirms the transaction. The
//! approval is a conditional `PENDING → APPROVED` update, so concurrent
//! verifiers of the same reference approve at most once.

use rust_decimal::Decimal;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderStatus, OrderType};
use shared::util::now_millis;

use crate::auth::{Identity, resolve_caller};
use crate::db::PaymentStamp;
use crate::error::{ServiceError, ServiceResult};
use crate::orders::{not_pending, reference};
use crate::payment::{
    Customization, GatewayEnvelope, GatewayError, InitializeRequest, PaymentMeta, VerifyData,
};
use crate::state::AppState;

/// Payment initialization input
#[derive(Debug, Clone)]
pub struct InitializePayment {
    pub order_id: String,
    pub citizen_id: String,
    pub amount: Decimal,
    pub order_type: OrderType,
}

/// Hosted checkout session
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub url: String,
    pub tx_ref: String,
}

/// Outcome of a successful verification
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedPayment {
    pub order_id: String,
    /// The order was approved before this call (no transition applied)
    #[serde(skip)]
    pub already_approved: bool,
}

/// Read-only payment status
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusView {
    pub order_id: String,
    pub tx_ref: String,
    /// Stored order status
    pub order_status: OrderStatus,
    /// Display status derived from the gateway (`APPROVED` or `PENDING`)
    pub payment_status: OrderStatus,
    /// Raw gateway transaction status
    pub gateway_status: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
}

/// Start a hosted checkout for a PENDING order.
///
/// The fresh reference is stamped on the order before the gateway is called
/// and stays there if the call fails: a reference without a gateway
/// transaction can never verify, and a retry stamps a new one.
pub async fn initialize_payment(
    state: &AppState,
    identity: &Identity,
    input: InitializePayment,
) -> ServiceResult<CheckoutSession> {
    let store = state.store.as_ref();
    let caller = resolve_caller(store, identity).await?;
    let station_id = caller.require_station()?;
    if !caller.role.can_register() {
        return Err(AppError::permission_denied("Only registrars may start payments").into());
    }

    let order = store
        .find_order(&input.order_id)
        .await?
        .filter(|o| o.station_id == station_id && o.citizen_id == input.citizen_id)
        .ok_or_else(|| AppError::order_not_found(&input.order_id))?;

    if input.amount <= Decimal::ZERO {
        return Err(AppError::validation("Amount must be positive")
            .with_detail("field", "amount")
            .into());
    }
    if order.order_status != OrderStatus::Pending {
        return Err(not_pending(&order).into());
    }

    let citizen = store
        .find_citizen(&order.citizen_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CitizenNotFound))?;

    let tx_ref = reference::allocate(store).await?;
    let stamped = store
        .stamp_payment(&PaymentStamp {
            order_id: &order.id,
            reference: &tx_ref,
            amount: input.amount,
            method: state.gateway.name(),
            now: now_millis(),
        })
        .await?;
    if !stamped {
        // Reviewed between the read above and the stamp
        return Err(AppError::new(ErrorCode::OrderNotPending).into());
    }

    tracing::info!(
        order_id = %order.id,
        tx_ref = %tx_ref,
        amount = %input.amount,
        "Payment reference stamped"
    );

    let request = InitializeRequest {
        amount: input.amount,
        currency: state.currency.clone(),
        phone_number: citizen.phone_number,
        first_name: citizen.first_name,
        last_name: citizen.last_name,
        tx_ref: tx_ref.clone(),
        callback_url: state.verification_url(&tx_ref),
        return_url: state.verification_url(&tx_ref),
        customization: Customization {
            title: "ID Card Payment".to_string(),
            description: format!("{} ID card order", input.order_type.as_db()),
        },
        meta: PaymentMeta {
            order_id: order.id.clone(),
            citizen_id: order.citizen_id.clone(),
            order_type: input.order_type.as_db().to_string(),
        },
    };

    match state.gateway.initialize(&request).await? {
        GatewayEnvelope::Success(data) => {
            tracing::info!(order_id = %order.id, tx_ref = %tx_ref, "Checkout session created");
            Ok(CheckoutSession {
                url: data.checkout_url,
                tx_ref,
            })
        }
        GatewayEnvelope::Failed { message } => {
            tracing::warn!(order_id = %order.id, tx_ref = %tx_ref, %message, "Chapa rejected initialization");
            Err(AppError::with_message(ErrorCode::ChapaInitFailed, message).into())
        }
        GatewayEnvelope::Unexpected(_) => Err(AppError::with_message(
            ErrorCode::ChapaInitFailed,
            "Unexpected response from Chapa",
        )
        .into()),
    }
}

/// Verify a reference with the gateway and approve its order.
///
/// Idempotent: an already approved order reports success without calling
/// the gateway.
pub async fn verify_payment(state: &AppState, tx_ref: &str) -> ServiceResult<VerifiedPayment> {
    let store = state.store.as_ref();
    let order = store
        .find_order_by_reference(tx_ref)
        .await?
        .ok_or_else(|| AppError::order_not_found(tx_ref))?;

    match order.order_status {
        OrderStatus::Approved => {
            tracing::debug!(order_id = %order.id, tx_ref, "Order already approved");
            return Ok(VerifiedPayment {
                order_id: order.id,
                already_approved: true,
            });
        }
        OrderStatus::Rejected => return Err(not_pending(&order).into()),
        OrderStatus::Pending => {}
    }

    let data = confirmed_transaction(state.gateway.verify(tx_ref).await, tx_ref)?;
    check_settlement(&order, &data, &state.currency)?;

    let applied = store
        .transition_status(
            &order.id,
            OrderStatus::Pending,
            OrderStatus::Approved,
            Some(state.gateway.name()),
            now_millis(),
        )
        .await?;

    if applied {
        tracing::info!(order_id = %order.id, tx_ref, "Payment verified, order approved");
        return Ok(VerifiedPayment {
            order_id: order.id,
            already_approved: false,
        });
    }

    // Lost a race: report whatever the winner left behind
    let current = store
        .find_order(&order.id)
        .await?
        .ok_or_else(|| AppError::order_not_found(&order.id))?;
    match current.order_status {
        OrderStatus::Approved => Ok(VerifiedPayment {
            order_id: current.id,
            already_approved: true,
        }),
        _ => Err(not_pending(&current).into()),
    }
}

/// Stored status joined with a live gateway lookup. Never writes.
pub async fn payment_status(
    state: &AppState,
    identity: &Identity,
    tx_ref: &str,
) -> ServiceResult<PaymentStatusView> {
    let store = state.store.as_ref();
    let caller = resolve_caller(store, identity).await?;
    let order = store
        .find_order_by_reference(tx_ref)
        .await?
        .filter(|o| caller.can_see(o))
        .ok_or_else(|| AppError::order_not_found(tx_ref))?;

    let view = |gateway_status: String,
                amount: Option<Decimal>,
                currency: Option<String>,
                confirmed: bool| PaymentStatusView {
        order_id: order.id.clone(),
        tx_ref: tx_ref.to_string(),
        order_status: order.order_status,
        payment_status: if confirmed {
            OrderStatus::Approved
        } else {
            OrderStatus::Pending
        },
        gateway_status,
        amount,
        currency,
    };

    match state.gateway.verify(tx_ref).await? {
        GatewayEnvelope::Success(data) => {
            let confirmed = data.is_confirmed();
            Ok(view(data.status, data.amount, data.currency, confirmed))
        }
        GatewayEnvelope::Failed { message } => {
            tracing::debug!(tx_ref, %message, "Gateway reports no successful transaction");
            Ok(view("failed".to_string(), None, None, false))
        }
        GatewayEnvelope::Unexpected(_) => Err(AppError::with_message(
            ErrorCode::ChapaApiError,
            "Unexpected response from Chapa",
        )
        .into()),
    }
}

/// A confirmed transaction must cover the order in the configured currency.
/// Overpayment is accepted and logged.
fn check_settlement(order: &Order, data: &VerifyData, currency: &str) -> Result<(), AppError> {
    if let Some(paid_currency) = data.currency.as_deref()
        && !paid_currency.eq_ignore_ascii_case(currency)
    {
        tracing::warn!(order_id = %order.id, paid_currency, currency, "Gateway currency mismatch");
        return Err(AppError::with_message(
            ErrorCode::PaymentVerificationFailed,
            format!("Payment made in {paid_currency}, expected {currency}"),
        )
        .with_detail("order", order.id.clone()));
    }

    match data.amount {
        Some(paid) if paid < order.amount => {
            tracing::warn!(
                order_id = %order.id,
                expected = %order.amount,
                paid = %paid,
                "Gateway amount below order amount"
            );
            Err(AppError::with_message(
                ErrorCode::PaymentVerificationFailed,
                format!("Paid amount {paid} is below the order amount {}", order.amount),
            )
            .with_detail("order", order.id.clone())
            .with_detail("expected", order.amount.to_string())
            .with_detail("paid", paid.to_string()))
        }
        Some(paid) if paid > order.amount => {
            tracing::warn!(
                order_id = %order.id,
                expected = %order.amount,
                paid = %paid,
                "Gateway amount above order amount"
            );
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Reduce a verify result to a confirmed transaction or a structured error
fn confirmed_transaction(
    result: Result<GatewayEnvelope<VerifyData>, GatewayError>,
    tx_ref: &str,
) -> ServiceResult<VerifyData> {
    let failed = |message: String| -> ServiceError {
        tracing::warn!(tx_ref, %message, "Payment verification failed");
        AppError::with_message(ErrorCode::PaymentVerificationFailed, message).into()
    };

    match result {
        Ok(GatewayEnvelope::Success(data)) if data.is_confirmed() => Ok(data),
        Ok(GatewayEnvelope::Success(data)) => Err(failed(format!(
            "Payment not completed (status: {})",
            data.status
        ))),
        Ok(GatewayEnvelope::Failed { message }) => Err(failed(message)),
        Ok(GatewayEnvelope::Unexpected(_)) => {
            Err(failed("Unexpected response from Chapa".to_string()))
        }
        // Credentials problem is ours, not the payer's
        Err(e @ GatewayError::Http { status: 401, .. }) => Err(e.into()),
        Err(GatewayError::Http { status, message }) => {
            Err(failed(format!("Chapa verification failed: HTTP {status}: {message}")))
        }
        Err(e) => Err(e.into()),
    }
}
