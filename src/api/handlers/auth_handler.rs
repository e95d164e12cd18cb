//! Authentication and user management handlers.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_role, CurrentUser};
use crate::api::AppState;
use crate::domain::{ProfilePatch, UserResponse, UserRole};
use crate::errors::AppResult;
use crate::services::{LoginResponse, RegisterUser};
use crate::types::MessageResponse;

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Login name
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "superadmin")]
    pub username: String,
    /// Password
    #[schema(example = "superadmin123")]
    pub password: String,
}

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Unique login name
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "warehouse1")]
    pub username: String,
    /// Password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    /// Contact email
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "warehouse1@system.com")]
    pub email: Option<String>,
    /// Display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Warehouse Staff")]
    pub name: String,
    /// Role assigned to the new account
    #[serde(default = "default_role")]
    pub role: UserRole,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub pob: Option<String>,
    pub dob: Option<String>,
}

fn default_role() -> UserRole {
    UserRole::Admin
}

/// Public authentication routes (no token required)
pub fn auth_public_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Protected authentication routes (token required)
pub fn auth_protected_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/users", get(list_users))
        .route("/users/:id", delete(delete_user))
        .route("/profile", put(update_profile))
}

/// Login and get a JWT token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Incorrect username or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = state
        .auth_service
        .login(payload.username, payload.password)
        .await?;

    Ok(Json(response))
}

/// Register a new user (SUPER_ADMIN only)
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - SUPER_ADMIN only"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn register(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    require_role(&current_user, &[UserRole::SuperAdmin])?;

    let user = state
        .auth_service
        .register(RegisterUser {
            username: payload.username,
            password: payload.password,
            email: payload.email,
            name: payload.name,
            role: payload.role,
            avatar: payload.avatar,
            phone: payload.phone,
            pob: payload.pob,
            dob: payload.dob,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// List all users (SUPER_ADMIN only)
#[utoipa::path(
    get,
    path = "/api/auth/users",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of all users", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - SUPER_ADMIN only")
    )
)]
pub async fn list_users(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserResponse>>> {
    require_role(&current_user, &[UserRole::SuperAdmin])?;

    let users = state.user_service.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Update own profile (any authenticated user)
#[utoipa::path(
    put,
    path = "/api/auth/profile",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ProfilePatch,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn update_profile(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(patch): ValidatedJson<ProfilePatch>,
) -> AppResult<Json<UserResponse>> {
    // The patch carries no role field, so a user can never raise their own
    // privileges here.
    let user = state
        .user_service
        .update_profile(current_user.id, patch)
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// Delete a user (SUPER_ADMIN only)
#[utoipa::path(
    delete,
    path = "/api/auth/users/{id}",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - SUPER_ADMIN only"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    require_role(&current_user, &[UserRole::SuperAdmin])?;

    state.user_service.delete_user(id).await?;
    Ok(Json(MessageResponse::new("User deleted")))
}
