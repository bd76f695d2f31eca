//! Shared types for the Feria storefront
//!
//! Domain models used across crates: catalog items, cart lines, bundles
//! and orders, plus the error taxonomy and id/time utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{StoreError, StoreResult};
pub use serde::{Deserialize, Serialize};
