//! Redis cache implementation.
//!
//! Provides a type-safe caching layer with connection pooling. The product
//! list is the only cached aggregate: one fixed key, fixed TTL, deleted
//! unconditionally on every catalog or stock mutation.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::{Config, CACHE_KEY_PRODUCT_LIST, PRODUCT_LIST_TTL_SECONDS};
use crate::domain::Product;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Read-through cache seam for the product list.
///
/// Services depend on this trait rather than on Redis, so the cache can be
/// mocked out in tests. All three operations are best-effort from the
/// caller's point of view: callers log and swallow the error.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductCache: Send + Sync {
    /// Fetch the cached product list, if present
    async fn get_products(&self) -> AppResult<Option<Vec<Product>>>;

    /// Replace the cached product list, with the fixed TTL
    async fn set_products(&self, products: &[Product]) -> AppResult<()>;

    /// Drop the cached product list. Absence of the key is not an error.
    async fn invalidate_products(&self) -> AppResult<()>;
}

/// Redis cache wrapper with connection pooling.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    /// Create a new cache instance and connect to Redis.
    ///
    /// # Panics
    /// Panics if Redis connection fails.
    pub async fn connect(config: &Config) -> Self {
        let client =
            Client::open(config.redis_url.as_str()).expect("Failed to create Redis client");

        let connection = ConnectionManager::new(client)
            .await
            .expect("Failed to connect to Redis");

        tracing::info!("Redis cache connected");

        Self { connection }
    }

    /// Try to connect to Redis, returning an error instead of panicking.
    pub async fn try_connect(config: &Config) -> Result<Self, RedisError> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        Ok(Self { connection })
    }

    // =========================================================================
    // Generic Cache Operations
    // =========================================================================

    /// Get a value from cache.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await.map_err(cache_error)?;

        match value {
            Some(json) => {
                let parsed = serde_json::from_str(&json).map_err(|e| {
                    AppError::internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Set a value in cache with a TTL (in seconds).
    pub async fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::internal(format!("Cache serialization error: {}", e)))?;

        conn.set_ex::<_, _, ()>(key, json, ttl_seconds)
            .await
            .map_err(cache_error)?;

        Ok(())
    }

    /// Delete a value from cache.
    pub async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(key).await.map_err(cache_error)?;
        Ok(())
    }

    /// Check if a key exists in cache.
    pub async fn exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.connection.clone();
        let exists: bool = conn.exists(key).await.map_err(cache_error)?;
        Ok(exists)
    }
}

#[async_trait]
impl ProductCache for Cache {
    async fn get_products(&self) -> AppResult<Option<Vec<Product>>> {
        self.get(CACHE_KEY_PRODUCT_LIST).await
    }

    async fn set_products(&self, products: &[Product]) -> AppResult<()> {
        self.set_with_ttl(CACHE_KEY_PRODUCT_LIST, &products, PRODUCT_LIST_TTL_SECONDS)
            .await
    }

    async fn invalidate_products(&self) -> AppResult<()> {
        self.delete(CACHE_KEY_PRODUCT_LIST).await
    }
}

/// Convert Redis error to AppError.
fn cache_error(e: RedisError) -> AppError {
    tracing::error!("Redis error: {}", e);
    AppError::internal(format!("Cache error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_and_ttl() {
        assert_eq!(CACHE_KEY_PRODUCT_LIST, "inventory:products");
        assert_eq!(PRODUCT_LIST_TTL_SECONDS, 300);
    }
}
