//! HTTP request handlers.

pub mod ai_handler;
pub mod auth_handler;
pub mod inventory_handler;
pub mod transaction_handler;

pub use ai_handler::ai_routes;
pub use auth_handler::{auth_protected_routes, auth_public_routes};
pub use inventory_handler::inventory_routes;
pub use transaction_handler::transaction_routes;
