//! AI insights handler.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::errors::AppResult;

/// AI insights request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsightsRequest {
    /// Free-form inventory summary rows forwarded to the model
    pub inventory_summary: Vec<serde_json::Value>,
}

/// AI insights response
#[derive(Debug, Serialize, ToSchema)]
pub struct InsightsResponse {
    /// Generated restock advice
    pub text: String,
}

/// Create AI routes
pub fn ai_routes() -> Router<AppState> {
    Router::new().route("/insights", post(insights))
}

/// Generate restock advice from an inventory summary
#[utoipa::path(
    post,
    path = "/api/ai/insights",
    tag = "AI",
    security(("bearer_auth" = [])),
    request_body = InsightsRequest,
    responses(
        (status = 200, description = "Generated insights", body = InsightsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Upstream failure"),
        (status = 503, description = "AI credential not configured")
    )
)]
pub async fn insights(
    Extension(_current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Json(payload): Json<InsightsRequest>,
) -> AppResult<Json<InsightsResponse>> {
    let text = state
        .insights_service
        .inventory_insights(&payload.inventory_summary)
        .await?;

    Ok(Json(InsightsResponse { text }))
}
