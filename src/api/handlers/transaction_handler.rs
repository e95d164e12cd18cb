//! Stock ledger handlers.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{TransactionRecord, TransactionType};
use crate::errors::AppResult;

/// Stock adjustment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdjustStockRequest {
    /// Product to adjust
    pub product_id: Uuid,
    /// Movement direction
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Units moved; must be positive
    #[validate(range(min = 1, message = "Quantity must be a positive integer"))]
    #[schema(example = 5)]
    pub quantity: i32,
}

/// Create ledger routes
pub fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transactions))
        .route("/adjust", post(adjust_stock))
}

/// List all stock transactions, newest first
#[utoipa::path(
    get,
    path = "/api/transactions",
    tag = "Transactions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Transaction log", body = Vec<TransactionRecord>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_transactions(
    Extension(_current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<TransactionRecord>>> {
    let transactions = state.stock_ledger.list_transactions().await?;
    Ok(Json(transactions))
}

/// Adjust a product's stock (any authenticated user)
#[utoipa::path(
    post,
    path = "/api/transactions/adjust",
    tag = "Transactions",
    security(("bearer_auth" = [])),
    request_body = AdjustStockRequest,
    responses(
        (status = 200, description = "Stock adjusted", body = TransactionRecord),
        (status = 400, description = "Insufficient stock or invalid quantity"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found"),
        (status = 503, description = "Lock contention, retry")
    )
)]
pub async fn adjust_stock(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AdjustStockRequest>,
) -> AppResult<Json<TransactionRecord>> {
    let record = state
        .stock_ledger
        .adjust_stock(
            payload.product_id,
            payload.kind,
            payload.quantity,
            current_user.id,
        )
        .await?;

    Ok(Json(record))
}
