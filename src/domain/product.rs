//! Product domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Product domain entity.
///
/// `stock` is never negative. It is mutated only through the stock ledger,
/// never by catalog updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: i32,
    pub min_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// True when the stock has fallen below the reorder threshold.
    pub fn needs_restock(&self) -> bool {
        self.stock < self.min_stock
    }
}

/// Data required to persist a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: i32,
    pub min_stock: i32,
}

/// Catalog patch applied field-by-field.
///
/// There is no stock field here: stock moves only through ledger
/// adjustments so the transaction log always reconciles with it.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Category cannot be empty"))]
    pub category: Option<String>,
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: Option<f64>,
    pub min_stock: Option<i32>,
}

/// Product response (client-facing)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[schema(example = "3b866bfb-7cf5-43a7-9b5a-0548187a64a1")]
    pub id: Uuid,
    /// Unique stock-keeping unit
    #[schema(example = "LAP-001")]
    pub sku: String,
    #[schema(example = "MacBook Pro M3 14\"")]
    pub name: String,
    #[schema(example = "Electronics")]
    pub category: String,
    #[schema(example = 1999.0)]
    pub price: f64,
    /// Current stock count (never negative)
    #[schema(example = 12)]
    pub stock: i32,
    /// Reorder threshold
    #[schema(example = 10)]
    pub min_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            sku: product.sku,
            name: product.name,
            category: product.category,
            price: product.price,
            stock: product.stock,
            min_stock: product.min_stock,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}
