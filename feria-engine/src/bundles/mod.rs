//! Bundle composition and persistence
//!
//! A bundle is edited as a [`BundleDraft`] driven by [`DraftCommand`]s;
//! the reducer in [`draft`] keeps the price and description derived from
//! the contents. Published bundles are stored by [`BundleRepository`].

pub mod draft;
mod repository;

pub use draft::{BundleDraft, DraftCommand, apply, publish};
pub use repository::BundleRepository;
