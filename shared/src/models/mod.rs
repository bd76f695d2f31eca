//! Data models
//!
//! Shared between the engine and the storefront/console frontends.
//! Persisted row tokens follow the store schema exactly (Spanish field
//! names on bundles and orders, camelCase on cart lines).

pub mod bundle;
pub mod cart_line;
pub mod catalog;
pub mod order;

// Re-exports
pub use bundle::*;
pub use cart_line::*;
pub use catalog::*;
pub use order::*;
