//! Application state - Dependency injection container.
//!
//! Built once at startup from the connected database and cache, then
//! cloned into every handler; no component reaches into global state.

use std::sync::Arc;

use crate::infra::{Cache, Database, ProductCache};
use crate::services::{
    AuthService, CatalogService, InsightsService, Services, StockLedger, UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Catalog service (cache-aware product listing and mutations)
    pub catalog_service: Arc<dyn CatalogService>,
    /// Stock ledger (the only stock write path)
    pub stock_ledger: Arc<dyn StockLedger>,
    /// AI insights service
    pub insights_service: Arc<dyn InsightsService>,
    /// Redis cache
    pub cache: Arc<Cache>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection, cache and config.
    pub fn from_config(
        database: Arc<Database>,
        cache: Arc<Cache>,
        config: crate::config::Config,
    ) -> Self {
        let product_cache: Arc<dyn ProductCache> = Arc::new(cache.as_ref().clone());
        let services = Services::from_connection(database.get_connection(), product_cache, config);

        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            catalog_service: services.catalog(),
            stock_ledger: services.ledger(),
            insights_service: services.insights(),
            cache,
            database,
        }
    }

    /// Create new application state with manually injected services.
    ///
    /// Used by tests to substitute mock services.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        catalog_service: Arc<dyn CatalogService>,
        stock_ledger: Arc<dyn StockLedger>,
        insights_service: Arc<dyn InsightsService>,
        cache: Arc<Cache>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            catalog_service,
            stock_ledger,
            insights_service,
            cache,
            database,
        }
    }
}
