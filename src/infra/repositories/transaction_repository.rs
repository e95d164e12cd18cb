//! Stock transaction repository implementation.
//!
//! Read-only outside the ledger's transaction scope: inserts happen through
//! the transaction-scoped repository so they commit atomically with the
//! stock update.

use async_trait::async_trait;
use sea_orm::{
    DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryOrder, QuerySelect,
    RelationTrait,
};
use uuid::Uuid;

use super::entities::{product, transaction, user};
use crate::domain::{TransactionRecord, TransactionType};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Ledger row joined with product and actor names.
#[derive(Debug, FromQueryResult)]
struct TransactionWithNames {
    id: Uuid,
    kind: String,
    quantity: i32,
    product_id: Uuid,
    user_id: Uuid,
    created_at: chrono::DateTime<chrono::Utc>,
    product_name: String,
    user_name: String,
}

impl From<TransactionWithNames> for TransactionRecord {
    fn from(row: TransactionWithNames) -> Self {
        TransactionRecord {
            id: row.id,
            kind: TransactionType::from(row.kind.as_str()),
            quantity: row.quantity,
            product_id: row.product_id,
            user_id: row.user_id,
            product_name: row.product_name,
            user_name: row.user_name,
            created_at: row.created_at,
        }
    }
}

/// Stock transaction repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// List the full ledger, newest first, with denormalized names
    async fn list_with_names(&self) -> AppResult<Vec<TransactionRecord>>;
}

/// Concrete implementation of TransactionRepository
pub struct TransactionStore {
    db: DatabaseConnection,
}

impl TransactionStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TransactionRepository for TransactionStore {
    async fn list_with_names(&self) -> AppResult<Vec<TransactionRecord>> {
        let rows = transaction::Entity::find()
            .column_as(product::Column::Name, "product_name")
            .column_as(user::Column::Name, "user_name")
            .join(JoinType::InnerJoin, transaction::Relation::Product.def())
            .join(JoinType::InnerJoin, transaction::Relation::User.def())
            .order_by_desc(transaction::Column::CreatedAt)
            .into_model::<TransactionWithNames>()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows.into_iter().map(TransactionRecord::from).collect())
    }
}
