//! Service Container - Centralized service construction and access.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, CatalogManager, CatalogService, GeminiInsights, InsightsService,
    LedgerEngine, StockLedger, UserManager, UserService,
};
use crate::config::Config;
use crate::infra::{Persistence, ProductCache};

/// Concrete service container wiring all services to the shared
/// persistence layer and cache.
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    catalog_service: Arc<dyn CatalogService>,
    stock_ledger: Arc<dyn StockLedger>,
    insights_service: Arc<dyn InsightsService>,
}

impl Services {
    /// Create service container from database connection, cache and config
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        cache: Arc<dyn ProductCache>,
        config: Config,
    ) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let insights_service = Arc::new(GeminiInsights::new(config.gemini_api_key.clone()));
        let auth_service = Arc::new(Authenticator::new(uow.clone(), config));
        let user_service = Arc::new(UserManager::new(uow.clone()));
        let catalog_service = Arc::new(CatalogManager::new(uow.clone(), cache.clone()));
        let stock_ledger = Arc::new(LedgerEngine::new(uow, cache));

        Self {
            auth_service,
            user_service,
            catalog_service,
            stock_ledger,
            insights_service,
        }
    }

    /// Get authentication service
    pub fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    /// Get user service
    pub fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    /// Get catalog service
    pub fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog_service.clone()
    }

    /// Get stock ledger
    pub fn ledger(&self) -> Arc<dyn StockLedger> {
        self.stock_ledger.clone()
    }

    /// Get insights service
    pub fn insights(&self) -> Arc<dyn InsightsService> {
        self.insights_service.clone()
    }
}
