//! Stock ledger service - The stock-adjustment transaction path.
//!
//! `adjust_stock` is the only code in the application that writes the stock
//! column. It runs check-and-write under an exclusive row lock on the
//! product, appends the ledger entry in the same database transaction, and
//! invalidates the product-list cache only after that transaction commits.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{next_stock, TransactionRecord, TransactionType};
use crate::errors::{AppResult, OptionExt};
use crate::infra::{ProductCache, TransactionRepository as _, UnitOfWork};

/// Stock ledger trait for dependency injection.
#[async_trait]
pub trait StockLedger: Send + Sync {
    /// Atomically adjust a product's stock and append a ledger entry.
    ///
    /// `quantity` must already be validated as positive. Fails with
    /// `NotFound` if the product does not exist and `InsufficientStock`
    /// when an `OUT` would drive stock negative; either failure rolls the
    /// whole unit back, leaving no ledger entry and no stock change.
    async fn adjust_stock(
        &self,
        product_id: Uuid,
        kind: TransactionType,
        quantity: i32,
        actor_id: Uuid,
    ) -> AppResult<TransactionRecord>;

    /// List the ledger, newest first, with denormalized names
    async fn list_transactions(&self) -> AppResult<Vec<TransactionRecord>>;
}

/// Concrete implementation of StockLedger using Unit of Work.
pub struct LedgerEngine<U: UnitOfWork> {
    uow: Arc<U>,
    cache: Arc<dyn ProductCache>,
}

impl<U: UnitOfWork> LedgerEngine<U> {
    /// Create new ledger instance with Unit of Work and cache
    pub fn new(uow: Arc<U>, cache: Arc<dyn ProductCache>) -> Self {
        Self { uow, cache }
    }
}

#[async_trait]
impl<U: UnitOfWork> StockLedger for LedgerEngine<U> {
    async fn adjust_stock(
        &self,
        product_id: Uuid,
        kind: TransactionType,
        quantity: i32,
        actor_id: Uuid,
    ) -> AppResult<TransactionRecord> {
        // One atomic unit: row lock, stock check + write, ledger append.
        // The lock covers exactly one product row, so adjustments of
        // different products never contend and no lock ordering is needed.
        let record = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let product = ctx
                        .products()
                        .find_by_id_for_update(product_id)
                        .await?
                        .ok_or_not_found()?;

                    // Check and write both happen while the row lock is
                    // held; no other adjustment can slip in between.
                    let new_stock = next_stock(product.stock, kind, quantity)?;
                    ctx.products().set_stock(product.id, new_stock).await?;

                    let tx = ctx
                        .transactions()
                        .insert(kind, quantity, product.id, actor_id)
                        .await?;

                    // Resolve the actor name here (plain read, no second
                    // lock) so the response needs no post-commit re-read.
                    let actor = ctx
                        .users()
                        .find_by_id(actor_id)
                        .await?
                        .ok_or_not_found()?;

                    Ok(TransactionRecord::from_parts(tx, product.name, actor.name))
                })
            })
            .await?;

        // Outside the lock, after commit. A failed invalidation must not
        // undo the committed adjustment; the TTL heals the stale entry.
        if let Err(e) = self.cache.invalidate_products().await {
            tracing::warn!(
                product_id = %product_id,
                "Product cache invalidation failed after stock adjustment: {}", e
            );
        }

        Ok(record)
    }

    async fn list_transactions(&self) -> AppResult<Vec<TransactionRecord>> {
        self.uow.transactions().list_with_names().await
    }
}
