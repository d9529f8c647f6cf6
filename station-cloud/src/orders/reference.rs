//! Transaction reference allocation
//!
//! References are UUID v4 strings checked against the store before use. The
//! check-then-stamp window is not atomic; a lost race surfaces as a store
//! error from the UNIQUE index instead of a shared reference.

use shared::error::{AppError, ErrorCode};

use crate::db::OrderStore;
use crate::error::ServiceResult;

/// Collision retries before giving up
pub const MAX_REFERENCE_ATTEMPTS: usize = 10;

/// Allocate a reference unused by any stored order
pub async fn allocate(store: &dyn OrderStore) -> ServiceResult<String> {
    allocate_with(store, || uuid::Uuid::new_v4().to_string()).await
}

/// Allocation loop with an injectable generator
pub async fn allocate_with<F>(store: &dyn OrderStore, mut generate: F) -> ServiceResult<String>
where
    F: FnMut() -> String + Send,
{
    for attempt in 1..=MAX_REFERENCE_ATTEMPTS {
        let candidate = generate();
        if !store.reference_exists(&candidate).await? {
            return Ok(candidate);
        }
        tracing::warn!(attempt, reference = %candidate, "Transaction reference collision");
    }

    tracing::error!(
        attempts = MAX_REFERENCE_ATTEMPTS,
        "Could not allocate a unique transaction reference"
    );
    Err(AppError::with_message(
        ErrorCode::ConfigError,
        "Failed to generate a unique transaction reference",
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, PaymentStamp};
    use rust_decimal::Decimal;
    use shared::models::{Order, OrderStatus, OrderType, PrintStatus};

    async fn store_with_reference(reference: &str) -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert_order(&Order {
                id: "o-1".into(),
                order_number: "ORD-1".into(),
                order_type: OrderType::Normal,
                order_status: OrderStatus::Pending,
                payment_method: None,
                payment_reference: None,
                amount: Decimal::from(300),
                print_status: PrintStatus::NotPrinted,
                printer_id: None,
                citizen_id: "c-1".into(),
                station_id: "s-1".into(),
                registrar_id: None,
                created_at: 1,
                updated_at: 1,
            })
            .await
            .unwrap();
        store
            .stamp_payment(&PaymentStamp {
                order_id: "o-1",
                reference,
                amount: Decimal::from(300),
                method: "chapa",
                now: 2,
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_allocates_uuid_v4() {
        let store = MemoryStore::new();
        let reference = allocate(&store).await.unwrap();
        let parsed = uuid::Uuid::parse_str(&reference).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[tokio::test]
    async fn test_regenerates_on_collision() {
        let store = store_with_reference("taken").await;
        let mut candidates = vec!["fresh", "taken"];
        let reference = allocate_with(&store, || candidates.pop().unwrap().to_string())
            .await
            .unwrap();
        assert_eq!(reference, "fresh");
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let store = store_with_reference("taken").await;
        let mut calls = 0;
        let err = allocate_with(&store, || {
            calls += 1;
            "taken".to_string()
        })
        .await
        .unwrap_err();
        assert_eq!(calls, MAX_REFERENCE_ATTEMPTS);

        let err: AppError = err.into();
        assert_eq!(err.cause(), "internal_error");
    }
}
