//! Feria storefront engine
//!
//! The cart and order composition engine behind the storefront and the
//! merchant console:
//!
//! - **cart**: addressable cart lines with merge-by-identity semantics and
//!   a persisted collection that survives the session
//! - **bundles**: merchant-curated packs with derived pricing, authored
//!   through a pure command reducer
//! - **checkout**: cart → immutable order record + deterministic
//!   fulfillment message
//! - **orders**: status workflow with optimistic local updates and
//!   guaranteed rollback on persistence failure
//! - **storage**: redb-backed persistence shared by the modules above
//!
//! # Data Flow
//!
//! ```text
//! CatalogItem → CartLine → CartStore → checkout → Order → OrderBoard
//!                  ↑
//!            Bundle (composer)
//! ```

pub mod bundles;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod money;
pub mod orders;
pub mod storage;

// Re-exports
pub use bundles::{BundleDraft, BundleRepository, DraftCommand};
pub use cart::{CartStore, CartStorage, RedbCartStorage};
pub use catalog::{CatalogSource, InMemoryCatalog};
pub use checkout::{Checkout, CustomerInfo};
pub use orders::{OrderBoard, OrderRepository, RedbOrderRepository, StatusChange};
pub use storage::{StorageError, StorageResult, StoreDb};
