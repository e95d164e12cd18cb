//! Stock ledger integration tests against a real PostgreSQL instance.
//!
//! These exercise the row-lock path that unit tests cannot reach. They are
//! ignored by default; to run them:
//!
//! 1. Start PostgreSQL and set DATABASE_URL
//! 2. cargo test -- --ignored

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use inventory_api::config::Config;
use inventory_api::domain::{NewProduct, NewUser, Product, TransactionType, UserRole};
use inventory_api::errors::{AppError, AppResult};
use inventory_api::infra::{
    Database, Persistence, ProductCache, ProductRepository as _, UnitOfWork, UserRepository as _,
};
use inventory_api::services::{LedgerEngine, StockLedger};

/// Cache stand-in: the ledger's invalidation hook needs a target, the
/// assertions here are about the store.
struct NoopCache;

#[async_trait]
impl ProductCache for NoopCache {
    async fn get_products(&self) -> AppResult<Option<Vec<Product>>> {
        Ok(None)
    }

    async fn set_products(&self, _products: &[Product]) -> AppResult<()> {
        Ok(())
    }

    async fn invalidate_products(&self) -> AppResult<()> {
        Ok(())
    }
}

struct Fixture {
    uow: Arc<Persistence>,
    engine: LedgerEngine<Persistence>,
    actor_id: Uuid,
}

async fn fixture() -> Fixture {
    let config = Config::from_env();
    let db = Database::connect(&config).await;
    let uow = Arc::new(Persistence::new(db.get_connection()));

    let actor = uow
        .users()
        .create(NewUser {
            id: None,
            username: format!("ledger-tester-{}", Uuid::new_v4()),
            email: None,
            password_hash: "hashed".to_string(),
            name: "Ledger Tester".to_string(),
            role: UserRole::Admin,
            avatar: None,
            phone: None,
            pob: None,
            dob: None,
        })
        .await
        .expect("create actor");

    let engine = LedgerEngine::new(uow.clone(), Arc::new(NoopCache));

    Fixture {
        uow,
        engine,
        actor_id: actor.id,
    }
}

async fn create_product(uow: &Persistence, stock: i32) -> Product {
    uow.products()
        .create(NewProduct {
            sku: format!("TST-{}", Uuid::new_v4()),
            name: "Test Product".to_string(),
            category: "Testing".to_string(),
            price: 10.0,
            stock,
            min_stock: 1,
        })
        .await
        .expect("create product")
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn adjust_out_then_overdraw_matches_the_ledger() {
    let fx = fixture().await;
    let product = create_product(&fx.uow, 12).await;

    // OUT 5 from 12 leaves 7 and records the movement
    let record = fx
        .engine
        .adjust_stock(product.id, TransactionType::Out, 5, fx.actor_id)
        .await
        .unwrap();
    assert_eq!(record.kind, TransactionType::Out);
    assert_eq!(record.quantity, 5);
    assert_eq!(record.product_name, "Test Product");
    assert_eq!(record.user_name, "Ledger Tester");

    let stored = fx.uow.products().find_by_id(product.id).await.unwrap().unwrap();
    assert_eq!(stored.stock, 7);

    // OUT 10 from 7 is rejected and changes nothing
    let before: Vec<_> = fx
        .engine
        .list_transactions()
        .await
        .unwrap()
        .into_iter()
        .filter(|t| t.product_id == product.id)
        .collect();

    let result = fx
        .engine
        .adjust_stock(product.id, TransactionType::Out, 10, fx.actor_id)
        .await;
    assert!(matches!(result.unwrap_err(), AppError::InsufficientStock));

    let stored = fx.uow.products().find_by_id(product.id).await.unwrap().unwrap();
    assert_eq!(stored.stock, 7);

    let after: Vec<_> = fx
        .engine
        .list_transactions()
        .await
        .unwrap()
        .into_iter()
        .filter(|t| t.product_id == product.id)
        .collect();
    assert_eq!(before.len(), after.len());
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn competing_outs_never_overdraw() {
    let fx = fixture().await;
    let product = create_product(&fx.uow, 10).await;

    // Combined quantity exceeds stock: exactly one may win
    let (a, b) = tokio::join!(
        fx.engine
            .adjust_stock(product.id, TransactionType::Out, 7, fx.actor_id),
        fx.engine
            .adjust_stock(product.id, TransactionType::Out, 7, fx.actor_id),
    );

    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one competing OUT may succeed");

    let loser = if a.is_err() { a } else { b };
    assert!(matches!(
        loser.unwrap_err(),
        AppError::InsufficientStock | AppError::Busy
    ));

    let stored = fx.uow.products().find_by_id(product.id).await.unwrap().unwrap();
    assert_eq!(stored.stock, 3, "final stock reflects only the winner");
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn adjustments_on_different_products_all_succeed_concurrently() {
    let fx = fixture().await;
    let first = create_product(&fx.uow, 5).await;
    let second = create_product(&fx.uow, 5).await;

    let (a, b) = tokio::join!(
        fx.engine
            .adjust_stock(first.id, TransactionType::In, 2, fx.actor_id),
        fx.engine
            .adjust_stock(second.id, TransactionType::Out, 2, fx.actor_id),
    );

    assert_eq!(a.unwrap().quantity, 2);
    assert_eq!(b.unwrap().quantity, 2);

    let first_stored = fx.uow.products().find_by_id(first.id).await.unwrap().unwrap();
    let second_stored = fx.uow.products().find_by_id(second.id).await.unwrap().unwrap();
    assert_eq!(first_stored.stock, 7);
    assert_eq!(second_stored.stock, 3);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn adjustment_of_missing_product_leaves_no_trace() {
    let fx = fixture().await;

    let before = fx.engine.list_transactions().await.unwrap().len();
    let result = fx
        .engine
        .adjust_stock(Uuid::new_v4(), TransactionType::In, 1, fx.actor_id)
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
    let after = fx.engine.list_transactions().await.unwrap().len();
    assert_eq!(before, after);
}
