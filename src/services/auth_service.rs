//! Authentication service - Handles credentials and token issuance.
//!
//! Role checks live in the API middleware; this service only proves who the
//! caller is and mints tokens.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, TOKEN_TYPE_BEARER};
use crate::domain::{NewUser, Password, User, UserResponse, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{UnitOfWork, UserRepository as _};

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
}

/// Response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "bearer")
    #[schema(example = "bearer")]
    pub token_type: String,
    /// The authenticated user
    pub user: UserResponse,
}

/// Registration payload accepted by the service.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub name: String,
    pub role: UserRole,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub pob: Option<String>,
    pub dob: Option<String>,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user account
    async fn register(&self, input: RegisterUser) -> AppResult<User>;

    /// Login and return a JWT token plus the user
    async fn login(&self, username: String, password: String) -> AppResult<LoginResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Generate JWT token for a user (shared helper to avoid duplication)
fn generate_token(user: &User, config: &Config) -> AppResult<String> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(token)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, input: RegisterUser) -> AppResult<User> {
        // Input shape is validated by the handler's ValidatedJson extractor
        if self
            .uow
            .users()
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Username"));
        }

        let password_hash = Password::new(&input.password)?.into_string();
        self.uow
            .users()
            .create(NewUser {
                id: None,
                username: input.username,
                email: input.email,
                password_hash,
                name: input.name,
                role: input.role,
                avatar: input.avatar,
                phone: input.phone,
                pob: input.pob,
                dob: input.dob,
            })
            .await
    }

    async fn login(&self, username: String, password: String) -> AppResult<LoginResponse> {
        let user_result = self.uow.users().find_by_username(&username).await?;

        // SECURITY: Perform password verification even if the user doesn't
        // exist to prevent timing attacks that could enumerate usernames.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

        let (password_hash, user_exists) = match &user_result {
            Some(user) => (user.password_hash.as_str(), true),
            None => (dummy_hash, false),
        };

        let stored_password = Password::from_hash(password_hash.to_string());
        let password_valid = stored_password.verify(&password);

        // Only succeed if both user exists AND password is valid
        if !user_exists || !password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let user = user_result.expect("user checked above");
        let access_token = generate_token(&user, &self.config)?;

        Ok(LoginResponse {
            access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            user: UserResponse::from(user),
        })
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{
        MockUserRepository, ProductRepository, TransactionContext, TransactionRepository,
        UnitOfWork, UserRepository,
    };
    use mockall::predicate::eq;

    /// UnitOfWork stub exposing only a mocked user repository.
    struct TestUnitOfWork {
        user_repo: Arc<MockUserRepository>,
    }

    impl TestUnitOfWork {
        fn new(user_repo: MockUserRepository) -> Self {
            Self {
                user_repo: Arc::new(user_repo),
            }
        }
    }

    #[async_trait]
    impl UnitOfWork for TestUnitOfWork {
        fn users(&self) -> Arc<dyn UserRepository> {
            self.user_repo.clone()
        }

        fn products(&self) -> Arc<dyn ProductRepository> {
            unimplemented!("not used by auth tests")
        }

        fn transactions(&self) -> Arc<dyn TransactionRepository> {
            unimplemented!("not used by auth tests")
        }

        async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
        where
            F: for<'a> FnOnce(
                    TransactionContext<'a>,
                ) -> std::pin::Pin<
                    Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
                > + Send,
            T: Send,
        {
            Err(AppError::internal("Transactions not supported in test mock"))
        }
    }

    fn stored_user(username: &str, password: &str) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: Some("admin@system.com".to_string()),
            password_hash: Password::new(password).unwrap().into_string(),
            name: "Super Admin".to_string(),
            role: UserRole::SuperAdmin,
            avatar: None,
            phone: None,
            pob: None,
            dob: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn authenticator(repo: MockUserRepository) -> Authenticator<TestUnitOfWork> {
        Authenticator::new(
            Arc::new(TestUnitOfWork::new(repo)),
            Config::for_tests("test-secret-key-for-testing-only-32chars"),
        )
    }

    #[tokio::test]
    async fn login_returns_token_and_user() {
        let user = stored_user("superadmin", "superadmin123");
        let mut repo = MockUserRepository::new();
        let stored = user.clone();
        repo.expect_find_by_username()
            .with(eq("superadmin"))
            .returning(move |_| Ok(Some(stored.clone())));

        let service = authenticator(repo);
        let response = service
            .login("superadmin".into(), "superadmin123".into())
            .await
            .unwrap();

        assert_eq!(response.token_type, "bearer");
        assert_eq!(response.user.id, user.id);

        // The issued token resolves back to the same subject
        let claims = service.verify_token(&response.access_token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let user = stored_user("superadmin", "superadmin123");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .returning(move |_| Ok(Some(user.clone())));

        let service = authenticator(repo);
        let result = service.login("superadmin".into(), "wrong-password".into()).await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_rejects_unknown_username() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(|_| Ok(None));

        let service = authenticator(repo);
        let result = service.login("ghost".into(), "superadmin123".into()).await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn register_rejects_duplicate_username() {
        let user = stored_user("taken", "superadmin123");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .returning(move |_| Ok(Some(user.clone())));
        // No create() expectation: a duplicate must never reach the insert
        let service = authenticator(repo);

        let result = service
            .register(RegisterUser {
                username: "taken".into(),
                password: "password123".into(),
                email: None,
                name: "Dup".into(),
                role: UserRole::Admin,
                avatar: None,
                phone: None,
                pob: None,
                dob: None,
            })
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn register_hashes_password_before_storing() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(|_| Ok(None));
        repo.expect_create().returning(|new_user: NewUser| {
            assert_ne!(new_user.password_hash, "password123");
            assert!(Password::from_hash(new_user.password_hash.clone()).verify("password123"));
            let now = Utc::now();
            Ok(User {
                id: new_user.id.unwrap_or_else(Uuid::new_v4),
                username: new_user.username,
                email: new_user.email,
                password_hash: new_user.password_hash,
                name: new_user.name,
                role: new_user.role,
                avatar: new_user.avatar,
                phone: new_user.phone,
                pob: new_user.pob,
                dob: new_user.dob,
                created_at: now,
                updated_at: now,
            })
        });

        let service = authenticator(repo);
        let user = service
            .register(RegisterUser {
                username: "staff".into(),
                password: "password123".into(),
                email: Some("staff@system.com".into()),
                name: "Staff".into(),
                role: UserRole::Admin,
                avatar: None,
                phone: None,
                pob: None,
                dob: None,
            })
            .await
            .unwrap();

        assert_eq!(user.username, "staff");
        assert_eq!(user.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn verify_token_rejects_garbage() {
        let repo = MockUserRepository::new();
        let service = authenticator(repo);

        assert!(service.verify_token("not-a-jwt").is_err());
    }
}
