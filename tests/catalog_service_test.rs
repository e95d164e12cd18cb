//! Catalog service tests - read-through caching and invalidation.
//!
//! These tests use in-memory stand-ins for the store and cache so they run
//! without PostgreSQL or Redis.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use inventory_api::domain::{NewProduct, Product, ProductPatch};
use inventory_api::errors::{AppError, AppResult};
use inventory_api::infra::{
    ProductCache, ProductRepository, TransactionContext, TransactionRepository, UnitOfWork,
    UserRepository,
};
use inventory_api::services::{CatalogManager, CatalogService};

// =============================================================================
// In-memory stand-ins
// =============================================================================

/// Cache stand-in backed by a mutex; counts invalidations.
#[derive(Default)]
struct InMemoryCache {
    products: Mutex<Option<Vec<Product>>>,
    invalidations: AtomicUsize,
}

#[async_trait]
impl ProductCache for InMemoryCache {
    async fn get_products(&self) -> AppResult<Option<Vec<Product>>> {
        Ok(self.products.lock().unwrap().clone())
    }

    async fn set_products(&self, products: &[Product]) -> AppResult<()> {
        *self.products.lock().unwrap() = Some(products.to_vec());
        Ok(())
    }

    async fn invalidate_products(&self) -> AppResult<()> {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
        *self.products.lock().unwrap() = None;
        Ok(())
    }
}

/// Cache stand-in whose every operation fails.
struct BrokenCache;

#[async_trait]
impl ProductCache for BrokenCache {
    async fn get_products(&self) -> AppResult<Option<Vec<Product>>> {
        Err(AppError::internal("cache down"))
    }

    async fn set_products(&self, _products: &[Product]) -> AppResult<()> {
        Err(AppError::internal("cache down"))
    }

    async fn invalidate_products(&self) -> AppResult<()> {
        Err(AppError::internal("cache down"))
    }
}

/// Product store stand-in; counts list reads to detect cache hits.
#[derive(Default)]
struct InMemoryProducts {
    rows: Mutex<Vec<Product>>,
    list_reads: AtomicUsize,
}

fn materialize(new_product: NewProduct) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::new_v4(),
        sku: new_product.sku,
        name: new_product.name,
        category: new_product.category,
        price: new_product.price,
        stock: new_product.stock,
        min_stock: new_product.min_stock,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl ProductRepository for InMemoryProducts {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_sku(&self, sku: &str) -> AppResult<Option<Product>> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.sku == sku).cloned())
    }

    async fn create(&self, new_product: NewProduct) -> AppResult<Product> {
        let product = materialize(new_product);
        self.rows.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn update(&self, id: Uuid, patch: ProductPatch) -> AppResult<Product> {
        let mut rows = self.rows.lock().unwrap();
        let product = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(AppError::NotFound)?;

        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(category) = patch.category {
            product.category = category;
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(min_stock) = patch.min_stock {
            product.min_stock = min_stock;
        }
        product.updated_at = Utc::now();

        Ok(product.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        if rows.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn list_by_recency(&self) -> AppResult<Vec<Product>> {
        self.list_reads.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(rows)
    }
}

/// UnitOfWork stand-in exposing only the product store.
struct StubUnitOfWork {
    products: Arc<InMemoryProducts>,
}

#[async_trait]
impl UnitOfWork for StubUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        unimplemented!("not used by catalog tests")
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }

    fn transactions(&self) -> Arc<dyn TransactionRepository> {
        unimplemented!("not used by catalog tests")
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
        Err(AppError::internal("Transactions not supported in test stub"))
    }
}

fn new_product(sku: &str, stock: i32) -> NewProduct {
    NewProduct {
        sku: sku.to_string(),
        name: format!("Product {}", sku),
        category: "Electronics".to_string(),
        price: 99.0,
        stock,
        min_stock: 5,
    }
}

fn catalog_with_cache(
    cache: Arc<dyn ProductCache>,
) -> (CatalogManager<StubUnitOfWork>, Arc<InMemoryProducts>) {
    let products = Arc::new(InMemoryProducts::default());
    let uow = Arc::new(StubUnitOfWork {
        products: products.clone(),
    });
    (CatalogManager::new(uow, cache), products)
}

// =============================================================================
// Read-through behavior
// =============================================================================

#[tokio::test]
async fn list_miss_populates_cache_and_hit_skips_store() {
    let cache = Arc::new(InMemoryCache::default());
    let (catalog, products) = catalog_with_cache(cache.clone());

    catalog.create_product(new_product("SKU-1", 3)).await.unwrap();

    // Miss: reads the store and repopulates the cache
    let first = catalog.list_products().await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(products.list_reads.load(Ordering::SeqCst), 1);
    assert!(cache.products.lock().unwrap().is_some());

    // Hit: the store is not consulted again
    let second = catalog.list_products().await.unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(products.list_reads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn broken_cache_degrades_to_store() {
    let (catalog, products) = catalog_with_cache(Arc::new(BrokenCache));

    catalog.create_product(new_product("SKU-2", 1)).await.unwrap();

    // Cache read, write and invalidation all fail, but the request succeeds
    let listed = catalog.list_products().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(products.list_reads.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Mutations and invalidation
// =============================================================================

#[tokio::test]
async fn every_mutation_invalidates_the_cached_list() {
    let cache = Arc::new(InMemoryCache::default());
    let (catalog, _products) = catalog_with_cache(cache.clone());

    let created = catalog.create_product(new_product("SKU-3", 2)).await.unwrap();
    assert_eq!(cache.invalidations.load(Ordering::SeqCst), 1);

    // Prime the cache, then mutate: the next list must reflect the change
    // even though the TTL has not elapsed
    catalog.list_products().await.unwrap();
    let patch = ProductPatch {
        name: Some("Renamed".to_string()),
        ..Default::default()
    };
    catalog.update_product(created.id, patch).await.unwrap();
    assert_eq!(cache.invalidations.load(Ordering::SeqCst), 2);

    let listed = catalog.list_products().await.unwrap();
    assert_eq!(listed[0].name, "Renamed");

    catalog.delete_product(created.id).await.unwrap();
    assert_eq!(cache.invalidations.load(Ordering::SeqCst), 3);
    assert!(catalog.list_products().await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_sku_is_a_conflict_and_writes_nothing() {
    let cache = Arc::new(InMemoryCache::default());
    let (catalog, products) = catalog_with_cache(cache.clone());

    catalog.create_product(new_product("SKU-4", 1)).await.unwrap();
    let result = catalog.create_product(new_product("SKU-4", 9)).await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
    assert_eq!(products.rows.lock().unwrap().len(), 1);
    // The failed create must not have invalidated anything further
    assert_eq!(cache.invalidations.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn catalog_update_never_changes_stock() {
    let cache = Arc::new(InMemoryCache::default());
    let (catalog, _products) = catalog_with_cache(cache);

    let created = catalog.create_product(new_product("SKU-5", 12)).await.unwrap();

    let patch = ProductPatch {
        price: Some(1.0),
        min_stock: Some(20),
        ..Default::default()
    };
    let updated = catalog.update_product(created.id, patch).await.unwrap();

    assert_eq!(updated.price, 1.0);
    assert_eq!(updated.min_stock, 20);
    assert_eq!(updated.stock, 12);
}

#[tokio::test]
async fn update_missing_product_is_not_found() {
    let cache = Arc::new(InMemoryCache::default());
    let (catalog, _products) = catalog_with_cache(cache.clone());

    let result = catalog
        .update_product(Uuid::new_v4(), ProductPatch::default())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
    // Nothing committed, nothing invalidated
    assert_eq!(cache.invalidations.load(Ordering::SeqCst), 0);
}
