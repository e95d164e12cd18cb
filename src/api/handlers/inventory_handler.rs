//! Product catalog handlers.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_role, CurrentUser};
use crate::api::AppState;
use crate::domain::{NewProduct, ProductPatch, ProductResponse, UserRole};
use crate::errors::AppResult;
use crate::types::MessageResponse;

/// Product creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    /// Unique stock-keeping unit
    #[validate(length(min = 1, message = "SKU is required"))]
    #[schema(example = "LAP-001")]
    pub sku: String,
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "MacBook Pro M3 14\"")]
    pub name: String,
    #[validate(length(min = 1, message = "Category is required"))]
    #[schema(example = "Electronics")]
    pub category: String,
    /// Unit price (non-negative)
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    #[schema(example = 1999.0)]
    pub price: f64,
    /// Initial stock count
    #[serde(default)]
    #[validate(range(min = 0, message = "Stock must not be negative"))]
    #[schema(example = 12)]
    pub stock: i32,
    /// Reorder threshold
    #[serde(default = "default_min_stock")]
    #[schema(example = 10)]
    pub min_stock: i32,
}

fn default_min_stock() -> i32 {
    5
}

/// Create catalog routes
pub fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/:id", put(update_product).delete(delete_product))
}

/// List products, most recently updated first (cache-aware)
#[utoipa::path(
    get,
    path = "/api/inventory",
    tag = "Inventory",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product list", body = Vec<ProductResponse>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_products(
    Extension(_current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProductResponse>>> {
    let products = state.catalog_service.list_products().await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

/// Create a product (ADMIN or SUPER_ADMIN)
#[utoipa::path(
    post,
    path = "/api/inventory",
    tag = "Inventory",
    security(("bearer_auth" = [])),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "SKU already exists")
    )
)]
pub async fn create_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ProductResponse>)> {
    require_role(&current_user, &[UserRole::Admin, UserRole::SuperAdmin])?;

    let product = state
        .catalog_service
        .create_product(NewProduct {
            sku: payload.sku,
            name: payload.name,
            category: payload.category,
            price: payload.price,
            stock: payload.stock,
            min_stock: payload.min_stock,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

/// Update a product's catalog fields (ADMIN or SUPER_ADMIN)
///
/// Stock is not part of the patch: stock only moves through the ledger.
#[utoipa::path(
    put,
    path = "/api/inventory/{id}",
    tag = "Inventory",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = ProductPatch,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(patch): ValidatedJson<ProductPatch>,
) -> AppResult<Json<ProductResponse>> {
    require_role(&current_user, &[UserRole::Admin, UserRole::SuperAdmin])?;

    let product = state.catalog_service.update_product(id, patch).await?;
    Ok(Json(ProductResponse::from(product)))
}

/// Delete a product (SUPER_ADMIN only)
#[utoipa::path(
    delete,
    path = "/api/inventory/{id}",
    tag = "Inventory",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - SUPER_ADMIN only"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    require_role(&current_user, &[UserRole::SuperAdmin])?;

    state.catalog_service.delete_product(id).await?;
    Ok(Json(MessageResponse::new("Product deleted")))
}
