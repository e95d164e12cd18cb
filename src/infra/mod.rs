//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - Caching (Redis)
//! - Unit of Work for transaction management

pub mod cache;
pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use cache::{Cache, ProductCache};
pub use db::{Database, Migrator};
pub use repositories::{
    ProductRepository, ProductStore, TransactionRepository, TransactionStore, UserRepository,
    UserStore,
};
pub use unit_of_work::{
    Persistence, TransactionContext, TxProductRepository, TxTransactionRepository,
    TxUserRepository, UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
pub use cache::MockProductCache;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockProductRepository, MockTransactionRepository, MockUserRepository};
