//! Stock ledger unit tests.
//!
//! The adjust path itself needs a real database transaction (see the
//! PostgreSQL integration tests); these tests cover what can run without
//! one: listing, and the rule that a failed adjustment never touches the
//! cache.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use inventory_api::domain::{Product, TransactionRecord, TransactionType};
use inventory_api::errors::{AppError, AppResult};
use inventory_api::infra::{
    ProductCache, ProductRepository, TransactionContext, TransactionRepository, UnitOfWork,
    UserRepository,
};
use inventory_api::services::{LedgerEngine, StockLedger};

/// Cache stand-in that only counts invalidations.
#[derive(Default)]
struct CountingCache {
    invalidations: AtomicUsize,
}

#[async_trait]
impl ProductCache for CountingCache {
    async fn get_products(&self) -> AppResult<Option<Vec<Product>>> {
        Ok(None)
    }

    async fn set_products(&self, _products: &[Product]) -> AppResult<()> {
        Ok(())
    }

    async fn invalidate_products(&self) -> AppResult<()> {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Ledger repository stand-in serving a fixed list.
struct FixedTransactions {
    records: Vec<TransactionRecord>,
}

#[async_trait]
impl TransactionRepository for FixedTransactions {
    async fn list_with_names(&self) -> AppResult<Vec<TransactionRecord>> {
        Ok(self.records.clone())
    }
}

/// UnitOfWork stand-in whose transactions always fail to begin.
struct TransactionlessUnitOfWork {
    transactions: Arc<FixedTransactions>,
}

#[async_trait]
impl UnitOfWork for TransactionlessUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        unimplemented!("not used by these tests")
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        unimplemented!("not used by these tests")
    }

    fn transactions(&self) -> Arc<dyn TransactionRepository> {
        self.transactions.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        Err(AppError::Busy)
    }
}

fn record(kind: TransactionType, quantity: i32) -> TransactionRecord {
    TransactionRecord {
        id: Uuid::new_v4(),
        kind,
        quantity,
        product_id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        product_name: "MacBook Pro M3 14\"".to_string(),
        user_name: "Super Admin".to_string(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn list_transactions_passes_through() {
    let records = vec![
        record(TransactionType::Out, 5),
        record(TransactionType::In, 3),
    ];
    let uow = Arc::new(TransactionlessUnitOfWork {
        transactions: Arc::new(FixedTransactions {
            records: records.clone(),
        }),
    });
    let engine = LedgerEngine::new(uow, Arc::new(CountingCache::default()));

    let listed = engine.list_transactions().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].quantity, 5);
    assert_eq!(listed[0].kind, TransactionType::Out);
}

#[tokio::test]
async fn failed_adjustment_does_not_invalidate_cache() {
    let cache = Arc::new(CountingCache::default());
    let uow = Arc::new(TransactionlessUnitOfWork {
        transactions: Arc::new(FixedTransactions { records: vec![] }),
    });
    let engine = LedgerEngine::new(uow, cache.clone());

    let result = engine
        .adjust_stock(Uuid::new_v4(), TransactionType::Out, 5, Uuid::new_v4())
        .await;

    // The transaction never committed, so the cache must stay untouched
    assert!(matches!(result.unwrap_err(), AppError::Busy));
    assert_eq!(cache.invalidations.load(Ordering::SeqCst), 0);
}
