//! Order Model
//!
//! One citizen's request for a printed ID card. `order_status` is the
//! payment/approval state machine; `print_status` tracks the downstream
//! printer workflow and moves independently of it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order type (price and SLA only)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    #[default]
    Normal,
    Urgent,
}

impl OrderType {
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "NORMAL" => Some(Self::Normal),
            "URGENT" => Some(Self::Urgent),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Urgent => "URGENT",
        }
    }
}

/// Order status (the controlled state)
///
/// `Pending` is the only source state: `Approved` and `Rejected` are
/// terminal and nothing moves an order back to `Pending`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl OrderStatus {
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Whether a transition from `self` to `target` is allowed
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Approved) | (Self::Pending, Self::Rejected)
        )
    }
}

/// Print workflow flag
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrintStatus {
    #[default]
    NotPrinted,
    ApprovedForPrint,
    Printed,
}

impl PrintStatus {
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "NOT_PRINTED" => Some(Self::NotPrinted),
            "APPROVED_FOR_PRINT" => Some(Self::ApprovedForPrint),
            "PRINTED" => Some(Self::Printed),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::NotPrinted => "NOT_PRINTED",
            Self::ApprovedForPrint => "APPROVED_FOR_PRINT",
            Self::Printed => "PRINTED",
        }
    }

    /// The state that must precede `self` (None for the initial state)
    pub fn predecessor(&self) -> Option<PrintStatus> {
        match self {
            Self::NotPrinted => None,
            Self::ApprovedForPrint => Some(Self::NotPrinted),
            Self::Printed => Some(Self::ApprovedForPrint),
        }
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub order_number: String,
    pub order_type: OrderType,
    pub order_status: OrderStatus,
    pub payment_method: Option<String>,
    /// Gateway transaction reference, globally unique once set
    pub payment_reference: Option<String>,
    /// Price charged in currency unit
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub print_status: PrintStatus,
    pub printer_id: Option<String>,
    pub citizen_id: String,
    pub station_id: String,
    pub registrar_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub citizen_id: String,
    #[serde(default)]
    pub order_type: OrderType,
    /// Defaults to the configured price for `order_type`
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
}

/// Per-status order counters
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub printed: i64,
}

impl OrderStats {
    pub fn total(&self) -> i64 {
        self.pending + self.approved + self.rejected
    }
}
