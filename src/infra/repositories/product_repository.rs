//! Product repository implementation.
//!
//! Catalog writes never touch the stock column; stock changes go through
//! the ledger's transaction-scoped repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use crate::domain::{NewProduct, Product, ProductPatch};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Product repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Find product by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;

    /// Find product by SKU
    async fn find_by_sku(&self, sku: &str) -> AppResult<Option<Product>>;

    /// Create a new product
    async fn create(&self, new_product: NewProduct) -> AppResult<Product>;

    /// Apply a catalog patch field-by-field (stock is not patchable)
    async fn update(&self, id: Uuid, patch: ProductPatch) -> AppResult<Product>;

    /// Delete product by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// List all products, most recently updated first
    async fn list_by_recency(&self) -> AppResult<Vec<Product>>;
}

/// Concrete implementation of ProductRepository
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        let result = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Product::from))
    }

    async fn find_by_sku(&self, sku: &str) -> AppResult<Option<Product>> {
        let result = ProductEntity::find()
            .filter(product::Column::Sku.eq(sku))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Product::from))
    }

    async fn create(&self, new_product: NewProduct) -> AppResult<Product> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            sku: Set(new_product.sku),
            name: Set(new_product.name),
            category: Set(new_product.category),
            price: Set(new_product.price),
            stock: Set(new_product.stock),
            min_stock: Set(new_product.min_stock),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Product::from(model))
    }

    async fn update(&self, id: Uuid, patch: ProductPatch) -> AppResult<Product> {
        let product = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = product.into();

        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(category) = patch.category {
            active.category = Set(category);
        }
        if let Some(price) = patch.price {
            active.price = Set(price);
        }
        if let Some(min_stock) = patch.min_stock {
            active.min_stock = Set(min_stock);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Product::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = ProductEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn list_by_recency(&self) -> AppResult<Vec<Product>> {
        let models = ProductEntity::find()
            .order_by_desc(product::Column::UpdatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Product::from).collect())
    }
}
