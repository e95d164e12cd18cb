//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::config::{ROLE_ADMIN, ROLE_SUPER_ADMIN};

/// User roles enumeration.
///
/// The hierarchy is flat: a `SUPER_ADMIN` does not implicitly satisfy an
/// `ADMIN`-only check. Gated operations enumerate every permitted role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    SuperAdmin,
    Admin,
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_SUPER_ADMIN => UserRole::SuperAdmin,
            _ => UserRole::Admin,
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::SuperAdmin => write!(f, "{}", ROLE_SUPER_ADMIN),
            UserRole::Admin => write!(f, "{}", ROLE_ADMIN),
        }
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub pob: Option<String>,
    pub dob: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data required to persist a new user.
///
/// `id` is normally generated by the repository; seeding passes a fixed id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Option<Uuid>,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub pob: Option<String>,
    pub dob: Option<String>,
}

/// Self-service profile patch.
///
/// Deliberately has no role field: role is immutable through profile update.
/// Each field is applied only when provided.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub pob: Option<String>,
    pub dob: Option<String>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// Unique login name
    #[schema(example = "superadmin")]
    pub username: String,
    /// Contact email, if provided
    #[schema(example = "admin@system.com")]
    pub email: Option<String>,
    /// Display name
    #[schema(example = "Super Admin")]
    pub name: String,
    /// Assigned role
    #[schema(example = "ADMIN")]
    pub role: UserRole,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub pob: Option<String>,
    pub dob: Option<String>,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            name: user.name,
            role: user.role,
            avatar: user.avatar,
            phone: user.phone,
            pob: user.pob,
            dob: user.dob,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        assert_eq!(UserRole::SuperAdmin.to_string(), "SUPER_ADMIN");
        assert_eq!(UserRole::Admin.to_string(), "ADMIN");
        assert_eq!(UserRole::from("SUPER_ADMIN"), UserRole::SuperAdmin);
        assert_eq!(UserRole::from("ADMIN"), UserRole::Admin);
    }

    #[test]
    fn patch_deserializes_from_camel_case() {
        let patch: ProfilePatch =
            serde_json::from_str(r#"{"name":"New Name","phone":"555-0101"}"#).unwrap();
        assert_eq!(patch.name.as_deref(), Some("New Name"));
        assert_eq!(patch.phone.as_deref(), Some("555-0101"));
        assert!(patch.email.is_none());
    }
}
