//! Payment verification endpoints
//!
//! - GET  /api/verify-payment/{tx_ref} — browser redirect after checkout
//! - POST /api/verify-payment/{tx_ref} — server-to-server callback
//!
//! Neither trusts the caller's claim about the payment: both re-query the
//! gateway. The POST variant must additionally carry a valid HMAC signature
//! of its raw body when a webhook secret is configured.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use http::{HeaderMap, StatusCode};
use serde_json::Value;
use shared::error::{ApiResponse, AppError, ErrorCode};

use crate::error::ServiceResult;
use crate::orders::{self, VerifiedPayment};
use crate::payment::signature;
use crate::state::AppState;

pub async fn verify_redirect(
    State(state): State<AppState>,
    Path(tx_ref): Path<String>,
) -> Response {
    verification_response(orders::verify_payment(&state, &tx_ref).await)
}

pub async fn verify_callback(
    State(state): State<AppState>,
    Path(tx_ref): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(secret) = &state.webhook_secret {
        let Some(sig) = signature::signature_header(&headers) else {
            tracing::warn!(tx_ref = %tx_ref, "Missing callback signature header");
            return failure(AppError::with_message(
                ErrorCode::InvalidSignature,
                "Missing callback signature",
            ));
        };
        if let Err(e) = signature::verify_signature(&body, sig, secret) {
            tracing::warn!(tx_ref = %tx_ref, error = e, "Callback signature verification failed");
            return failure(AppError::new(ErrorCode::InvalidSignature));
        }
    }

    if let Some(claimed) = body_reference(&body)
        && claimed != tx_ref
    {
        tracing::warn!(tx_ref = %tx_ref, claimed = %claimed, "Callback reference does not match path");
        return failure(
            AppError::validation("Callback reference does not match").with_detail("txRef", claimed),
        );
    }

    tracing::info!(tx_ref = %tx_ref, "Payment callback received");
    verification_response(orders::verify_payment(&state, &tx_ref).await)
}

/// `tx_ref` (or `trx_ref`) claimed in a JSON callback body
fn body_reference(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    ["tx_ref", "trx_ref"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

/// 200 on success, 500 on system errors, 400 on every other failure
fn verification_response(result: ServiceResult<VerifiedPayment>) -> Response {
    match result {
        Ok(verified) => {
            let message = if verified.already_approved {
                "Payment already verified"
            } else {
                "Payment verified successfully"
            };
            ApiResponse::success_with_message(message, verified).into_response()
        }
        Err(e) => failure(e.into()),
    }
}

fn failure(err: AppError) -> Response {
    let status = if err.code.category().is_system() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::BAD_REQUEST
    };
    if status.is_server_error() {
        tracing::error!(code = %err.code, message = %err.message, "Verification failed");
    }
    (status, Json(ApiResponse::<()>::error(&err))).into_response()
}
