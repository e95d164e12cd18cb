//! Catalog service - Product listing and catalog mutations.
//!
//! Reads go through the product-list cache; every mutation funnels through
//! one post-commit invalidation hook so no write path can forget it. The
//! cache is best-effort: any cache failure degrades to the store and is
//! logged, never surfaced to the caller.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{NewProduct, Product, ProductPatch};
use crate::errors::{AppError, AppResult};
use crate::infra::{ProductCache, ProductRepository as _, UnitOfWork};

/// Catalog service trait for dependency injection.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// List products, most recently updated first (cache-aware)
    async fn list_products(&self) -> AppResult<Vec<Product>>;

    /// Create a product; duplicate SKU is a conflict
    async fn create_product(&self, new_product: NewProduct) -> AppResult<Product>;

    /// Patch a product's catalog fields (never its stock)
    async fn update_product(&self, id: Uuid, patch: ProductPatch) -> AppResult<Product>;

    /// Delete a product
    async fn delete_product(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of CatalogService using Unit of Work.
pub struct CatalogManager<U: UnitOfWork> {
    uow: Arc<U>,
    cache: Arc<dyn ProductCache>,
}

impl<U: UnitOfWork> CatalogManager<U> {
    /// Create new catalog service instance with Unit of Work and cache
    pub fn new(uow: Arc<U>, cache: Arc<dyn ProductCache>) -> Self {
        Self { uow, cache }
    }

    /// Post-commit invalidation hook shared by every catalog mutation.
    ///
    /// Runs after the store write has committed; a failure here leaves a
    /// stale cache that the TTL heals, so it is logged and swallowed.
    async fn invalidate_cache(&self) {
        if let Err(e) = self.cache.invalidate_products().await {
            tracing::warn!("Product cache invalidation failed: {}", e);
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for CatalogManager<U> {
    async fn list_products(&self) -> AppResult<Vec<Product>> {
        // Cache hit path never touches the store
        match self.cache.get_products().await {
            Ok(Some(products)) => return Ok(products),
            Ok(None) => {}
            Err(e) => tracing::warn!("Product cache read failed, falling back to store: {}", e),
        }

        let products = self.uow.products().list_by_recency().await?;

        if let Err(e) = self.cache.set_products(&products).await {
            tracing::warn!("Product cache write failed: {}", e);
        }

        Ok(products)
    }

    async fn create_product(&self, new_product: NewProduct) -> AppResult<Product> {
        if self
            .uow
            .products()
            .find_by_sku(&new_product.sku)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("SKU"));
        }

        let product = self.uow.products().create(new_product).await?;
        self.invalidate_cache().await;
        Ok(product)
    }

    async fn update_product(&self, id: Uuid, patch: ProductPatch) -> AppResult<Product> {
        let product = self.uow.products().update(id, patch).await?;
        self.invalidate_cache().await;
        Ok(product)
    }

    async fn delete_product(&self, id: Uuid) -> AppResult<()> {
        self.uow.products().delete(id).await?;
        self.invalidate_cache().await;
        Ok(())
    }
}
