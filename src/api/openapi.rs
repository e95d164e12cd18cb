//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{ai_handler, auth_handler, inventory_handler, transaction_handler};
use crate::domain::{
    ProductPatch, ProductResponse, ProfilePatch, TransactionRecord, TransactionType, UserResponse,
    UserRole,
};
use crate::services::LoginResponse;
use crate::types::MessageResponse;

/// OpenAPI documentation for the Smart Inventory API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Smart Inventory API",
        version = "0.1.0",
        description = "Inventory management backend with role-based access, a cached product catalog, and an append-only stock ledger",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::login,
        auth_handler::register,
        auth_handler::list_users,
        auth_handler::update_profile,
        auth_handler::delete_user,
        // Inventory endpoints
        inventory_handler::list_products,
        inventory_handler::create_product,
        inventory_handler::update_product,
        inventory_handler::delete_product,
        // Ledger endpoints
        transaction_handler::list_transactions,
        transaction_handler::adjust_stock,
        // AI endpoints
        ai_handler::insights,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            ProfilePatch,
            ProductResponse,
            ProductPatch,
            TransactionType,
            TransactionRecord,
            // Request/response types
            auth_handler::LoginRequest,
            auth_handler::RegisterRequest,
            inventory_handler::CreateProductRequest,
            transaction_handler::AdjustStockRequest,
            ai_handler::InsightsRequest,
            ai_handler::InsightsResponse,
            LoginResponse,
            MessageResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and user management"),
        (name = "Inventory", description = "Product catalog operations"),
        (name = "Transactions", description = "Stock ledger operations"),
        (name = "AI", description = "AI-assisted insights")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
