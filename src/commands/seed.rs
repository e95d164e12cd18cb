//! Seed command - Creates the initial SUPER_ADMIN account and sample data.
//!
//! Idempotent: keyed on the well-known SUPER_ADMIN id, so repeated startups
//! are no-ops once the account exists.

use std::sync::Arc;
use uuid::Uuid;

use crate::config::{
    Config, SEED_SUPER_ADMIN_ID, SEED_SUPER_ADMIN_PASSWORD, SEED_SUPER_ADMIN_USERNAME,
};
use crate::domain::{NewProduct, NewUser, Password, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{
    Database, Persistence, ProductRepository as _, UnitOfWork, UserRepository as _,
};

/// Execute the seed command against a fresh connection
pub async fn execute(config: Config) -> AppResult<()> {
    let db = Arc::new(Database::connect(&config).await);
    run(&db).await
}

/// Seed the database through an existing connection.
///
/// Called on every `serve` startup after migrations.
pub async fn run(db: &Database) -> AppResult<()> {
    let uow = Persistence::new(db.get_connection());

    let admin_id = Uuid::parse_str(SEED_SUPER_ADMIN_ID)
        .map_err(|e| AppError::internal(format!("Invalid seed id: {}", e)))?;
    if uow.users().find_by_id(admin_id).await?.is_some() {
        tracing::info!("Seed user already exists, skipping seed");
        return Ok(());
    }

    let password_hash = Password::new(SEED_SUPER_ADMIN_PASSWORD)?.into_string();
    uow.users()
        .create(NewUser {
            id: Some(admin_id),
            username: SEED_SUPER_ADMIN_USERNAME.to_string(),
            email: Some("admin@system.com".to_string()),
            password_hash,
            name: "Super Admin".to_string(),
            role: UserRole::SuperAdmin,
            avatar: None,
            phone: None,
            pob: None,
            dob: None,
        })
        .await?;

    let samples = [
        NewProduct {
            sku: "LAP-001".to_string(),
            name: "MacBook Pro M3 14\"".to_string(),
            category: "Electronics".to_string(),
            price: 1999.0,
            stock: 12,
            min_stock: 10,
        },
        NewProduct {
            sku: "PHN-001".to_string(),
            name: "iPhone 15 Pro Max".to_string(),
            category: "Electronics".to_string(),
            price: 1199.0,
            stock: 5,
            min_stock: 8,
        },
    ];

    for product in samples {
        uow.products().create(product).await?;
    }

    tracing::info!("Seeding finished successfully");
    Ok(())
}
