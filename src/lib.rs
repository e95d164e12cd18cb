//! Smart Inventory API
//!
//! Inventory-management backend: user accounts with role-based access, a
//! cached product catalog, and an append-only stock ledger that adjusts
//! stock under an exclusive row lock.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations (serve, migrate, seed)
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and stock arithmetic
//! - **services**: Application use cases (auth, catalog, ledger, insights)
//! - **infra**: Infrastructure concerns (database, cache, unit of work)
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server (runs migrations and seeds on startup)
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Seed the SUPER_ADMIN account and sample products
//! cargo run -- seed
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, Product, TransactionType, User, UserRole};
pub use errors::{AppError, AppResult};
pub use infra::Cache;
