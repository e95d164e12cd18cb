//! Stock transaction domain types and the stock arithmetic they obey.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    In,
    Out,
}

impl From<&str> for TransactionType {
    fn from(s: &str) -> Self {
        match s {
            "OUT" => TransactionType::Out,
            _ => TransactionType::In,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::In => write!(f, "IN"),
            TransactionType::Out => write!(f, "OUT"),
        }
    }
}

/// One immutable entry in the append-only stock ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockTransaction {
    pub id: Uuid,
    pub kind: TransactionType,
    pub quantity: i32,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Ledger entry joined with the product and actor names for presentation.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[schema(example = 5)]
    pub quantity: i32,
    pub product_id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "MacBook Pro M3 14\"")]
    pub product_name: String,
    #[schema(example = "Super Admin")]
    pub user_name: String,
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Join a persisted transaction with the denormalized display names.
    pub fn from_parts(tx: StockTransaction, product_name: String, user_name: String) -> Self {
        Self {
            id: tx.id,
            kind: tx.kind,
            quantity: tx.quantity,
            product_id: tx.product_id,
            user_id: tx.user_id,
            product_name,
            user_name,
            created_at: tx.created_at,
        }
    }
}

/// Apply a stock movement to a current stock level.
///
/// `IN` has no upper bound; `OUT` must not drive the stock negative. The
/// caller is expected to hold the product row lock across this check and
/// the subsequent write.
pub fn next_stock(current: i32, kind: TransactionType, quantity: i32) -> AppResult<i32> {
    match kind {
        TransactionType::In => Ok(current + quantity),
        TransactionType::Out if current < quantity => Err(AppError::InsufficientStock),
        TransactionType::Out => Ok(current - quantity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbound_adjustments_accumulate() {
        assert_eq!(next_stock(0, TransactionType::In, 7).unwrap(), 7);
        assert_eq!(next_stock(12, TransactionType::In, 3).unwrap(), 15);
    }

    #[test]
    fn outbound_adjustment_within_stock() {
        assert_eq!(next_stock(12, TransactionType::Out, 5).unwrap(), 7);
        // draining to exactly zero is allowed
        assert_eq!(next_stock(7, TransactionType::Out, 7).unwrap(), 0);
    }

    #[test]
    fn overdraw_is_rejected() {
        let err = next_stock(7, TransactionType::Out, 10).unwrap_err();
        assert!(matches!(err, AppError::InsufficientStock));

        let err = next_stock(0, TransactionType::Out, 1).unwrap_err();
        assert!(matches!(err, AppError::InsufficientStock));
    }

    #[test]
    fn type_round_trips_through_strings() {
        assert_eq!(TransactionType::In.to_string(), "IN");
        assert_eq!(TransactionType::Out.to_string(), "OUT");
        assert_eq!(TransactionType::from("IN"), TransactionType::In);
        assert_eq!(TransactionType::from("OUT"), TransactionType::Out);
    }
}
