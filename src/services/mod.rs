//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod auth_service;
mod catalog_service;
pub mod container;
mod insights_service;
mod ledger_service;
mod user_service;

// Service Container
pub use container::Services;

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, LoginResponse, RegisterUser};
pub use catalog_service::{CatalogManager, CatalogService};
pub use insights_service::{GeminiInsights, InsightsService};
pub use ledger_service::{LedgerEngine, StockLedger};
pub use user_service::{UserManager, UserService};
