//! Catalog read access
//!
//! The catalog is an external collaborator: the engine only reads product
//! records from it. The trait seam keeps the engine testable and lets the
//! frontends plug in whatever catalog backend they use.

use shared::models::CatalogItem;
use std::collections::HashMap;

/// Read-only catalog lookup
pub trait CatalogSource {
    /// Fetch a catalog item by id
    fn item(&self, id: &str) -> Option<CatalogItem>;
}

/// HashMap-backed catalog (fixtures and tests)
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    items: HashMap<String, CatalogItem>,
}

impl InMemoryCatalog {
    pub fn new(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        Self {
            items: items.into_iter().map(|i| (i.id.clone(), i)).collect(),
        }
    }
}

impl CatalogSource for InMemoryCatalog {
    fn item(&self, id: &str) -> Option<CatalogItem> {
        self.items.get(id).cloned()
    }
}
