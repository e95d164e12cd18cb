//! JWT authentication middleware and role gate.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::UserRole;
use crate::errors::AppError;

/// Authenticated user resolved from the bearer token.
///
/// Identity and role come from the store, not the token payload, so a role
/// change or account deletion takes effect on the next request.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
}

/// JWT authentication middleware.
///
/// Extracts and validates the JWT token from the Authorization header,
/// resolves the subject against the user store, then injects the
/// CurrentUser into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let claims = state.auth_service.verify_token(token)?;

    // A valid token for a since-deleted account must not authenticate
    let user = match state.user_service.get_user(claims.sub).await {
        Ok(user) => user,
        Err(AppError::NotFound) => return Err(AppError::Unauthorized),
        Err(e) => return Err(e),
    };

    let current_user = CurrentUser {
        id: user.id,
        username: user.username,
        role: user.role,
    };

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Require the user's role to be in the allowed set.
///
/// The set is exact: roles never imply one another, so every caller spells
/// out the complete list of permitted roles.
pub fn require_role(user: &CurrentUser, allowed: &[UserRole]) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_role(role: UserRole) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            username: "someone".into(),
            role,
        }
    }

    #[test]
    fn role_gate_is_exact_membership() {
        let super_admin = user_with_role(UserRole::SuperAdmin);
        let admin = user_with_role(UserRole::Admin);

        assert!(require_role(&super_admin, &[UserRole::SuperAdmin]).is_ok());
        assert!(require_role(&admin, &[UserRole::SuperAdmin]).is_err());

        // No implicit escalation: SUPER_ADMIN fails an ADMIN-only check
        assert!(require_role(&super_admin, &[UserRole::Admin]).is_err());

        // Enumerating both roles admits both
        let both = [UserRole::Admin, UserRole::SuperAdmin];
        assert!(require_role(&super_admin, &both).is_ok());
        assert!(require_role(&admin, &both).is_ok());
    }
}
