//! Unit of Work pattern implementation.
//!
//! Manages transaction lifecycle and transaction-scoped repository access.
//! The stock ledger runs entirely inside one `transaction` call: the product
//! row lock taken by `find_by_id_for_update` lives exactly as long as the
//! closure, and release on every exit path (commit or rollback) is
//! structural rather than a caller obligation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QuerySelect, Set,
    TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::entities::{product, transaction, user};
use super::repositories::{
    ProductRepository, ProductStore, TransactionRepository, TransactionStore, UserRepository,
    UserStore,
};
use crate::domain::{Product, StockTransaction, TransactionType, User};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction management.
/// Note: This trait is not mockable directly due to generic methods.
/// For testing, mock at the repository level or use integration tests.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get product repository
    fn products(&self) -> Arc<dyn ProductRepository>;

    /// Get stock transaction repository
    fn transactions(&self) -> Arc<dyn TransactionRepository>;

    /// Execute a closure within a database transaction.
    ///
    /// The transaction is committed on success and rolled back on error;
    /// any row locks taken inside end with it either way.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same database transaction. The context borrows the transaction
/// to ensure proper lifetime management.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Get product repository for this transaction
    pub fn products(&self) -> TxProductRepository<'_> {
        TxProductRepository::new(self.txn)
    }

    /// Get stock transaction repository for this transaction
    pub fn transactions(&self) -> TxTransactionRepository<'_> {
        TxTransactionRepository::new(self.txn)
    }

    /// Get user repository for this transaction
    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    product_repo: Arc<ProductStore>,
    transaction_repo: Arc<TransactionStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        let product_repo = Arc::new(ProductStore::new(db.clone()));
        let transaction_repo = Arc::new(TransactionStore::new(db.clone()));
        Self {
            db,
            user_repo,
            product_repo,
            transaction_repo,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.product_repo.clone()
    }

    fn transactions(&self) -> Arc<dyn TransactionRepository> {
        self.transaction_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self.db.begin().await.map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware product repository.
///
/// Executes all operations within the provided transaction.
pub struct TxProductRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxProductRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Select a product with an exclusive row lock (`SELECT ... FOR UPDATE`).
    ///
    /// Serializes concurrent adjustments of the same product; rows of other
    /// products stay untouched. A lock-wait timeout surfaces as `Busy`.
    pub async fn find_by_id_for_update(&self, id: Uuid) -> AppResult<Option<Product>> {
        let result = product::Entity::find_by_id(id)
            .lock_exclusive()
            .one(self.txn)
            .await
            .map_err(AppError::from_locked_db)?;

        Ok(result.map(Product::from))
    }

    /// Write a new stock value for a product whose row lock is held.
    pub async fn set_stock(&self, id: Uuid, stock: i32) -> AppResult<Product> {
        let active = product::ActiveModel {
            id: Set(id),
            stock: Set(stock),
            updated_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        let model = active.update(self.txn).await.map_err(AppError::from)?;
        Ok(Product::from(model))
    }
}

/// Transaction-aware stock transaction repository.
pub struct TxTransactionRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxTransactionRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Append a ledger entry; commits or rolls back with the enclosing
    /// transaction, so it is never visible without its stock update.
    pub async fn insert(
        &self,
        kind: TransactionType,
        quantity: i32,
        product_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<StockTransaction> {
        let active = transaction::ActiveModel {
            id: Set(Uuid::new_v4()),
            kind: Set(kind.to_string()),
            quantity: Set(quantity),
            product_id: Set(product_id),
            user_id: Set(user_id),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active.insert(self.txn).await.map_err(AppError::from)?;
        Ok(StockTransaction::from(model))
    }
}

/// Transaction-aware user repository.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Find user by ID (plain read, no lock)
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = user::Entity::find_by_id(id)
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }
}
