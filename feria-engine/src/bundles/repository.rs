//! Bundle persistence
//!
//! Bundle rows and their content refs live in separate tables, matching
//! the store schema (`nombre`, `precio_oferta`, ... on rows; `oferta_id`,
//! `producto_id`, `nombre_manual`, `precio_manual`, `cantidad` on child
//! rows). Catalog refs persist no label of their own; the display name is
//! resolved from the catalog on load, falling back to the catalog id when
//! the item has since disappeared.

use redb::ReadableTable;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::CatalogSource;
use crate::storage::{
    BUNDLE_CONTENTS_TABLE, BUNDLES_TABLE, SETTINGS_TABLE, StorageError, StorageResult, StoreDb,
};
use shared::models::{Bundle, BundleContentRef};

/// Settings key for the global promotional-event toggle
const EVENT_ACTIVE_KEY: &str = "cyber_event";

/// Persisted content ref (child row schema)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct BundleContentRow {
    pub oferta_id: String,
    pub producto_id: Option<String>,
    pub nombre_manual: Option<String>,
    pub precio_manual: Decimal,
    pub cantidad: i32,
}

impl BundleContentRow {
    fn from_ref(bundle_id: &str, content: &BundleContentRef) -> Self {
        match content {
            BundleContentRef::Catalog {
                catalog_id,
                unit_price,
                quantity,
                ..
            } => Self {
                oferta_id: bundle_id.to_string(),
                producto_id: Some(catalog_id.clone()),
                nombre_manual: None,
                precio_manual: *unit_price,
                cantidad: *quantity,
            },
            BundleContentRef::Manual {
                label,
                unit_price,
                quantity,
            } => Self {
                oferta_id: bundle_id.to_string(),
                producto_id: None,
                nombre_manual: Some(label.clone()),
                precio_manual: *unit_price,
                cantidad: *quantity,
            },
        }
    }

    fn into_ref(self, catalog: &dyn CatalogSource) -> BundleContentRef {
        match self.producto_id {
            Some(catalog_id) => {
                let label = catalog
                    .item(&catalog_id)
                    .map(|item| item.name)
                    .unwrap_or_else(|| catalog_id.clone());
                BundleContentRef::Catalog {
                    catalog_id,
                    label,
                    unit_price: self.precio_manual,
                    quantity: self.cantidad,
                }
            }
            None => BundleContentRef::Manual {
                label: self.nombre_manual.unwrap_or_default(),
                unit_price: self.precio_manual,
                quantity: self.cantidad,
            },
        }
    }
}

/// Bundle store backed by redb
#[derive(Clone)]
pub struct BundleRepository {
    db: StoreDb,
}

impl BundleRepository {
    pub fn new(db: StoreDb) -> Self {
        Self { db }
    }

    /// Insert or replace a bundle row and its content refs in one transaction
    pub fn save(&self, bundle: &Bundle) -> StorageResult<()> {
        let row_bytes = serde_json::to_vec(bundle)?;
        let txn = self.db.begin_write()?;
        {
            let mut rows = txn.open_table(BUNDLES_TABLE)?;
            rows.insert(bundle.id.as_str(), row_bytes.as_slice())?;

            let mut contents = txn.open_table(BUNDLE_CONTENTS_TABLE)?;
            remove_content_rows(&mut contents, &bundle.id)?;
            for (idx, content) in bundle.contents.iter().enumerate() {
                let row = BundleContentRow::from_ref(&bundle.id, content);
                let bytes = serde_json::to_vec(&row)?;
                contents.insert((bundle.id.as_str(), idx as u32), bytes.as_slice())?;
            }
        }
        txn.commit()?;
        debug!(bundle_id = %bundle.id, contents = bundle.contents.len(), "bundle saved");
        Ok(())
    }

    /// Fetch one bundle with its contents attached
    pub fn get(&self, id: &str, catalog: &dyn CatalogSource) -> StorageResult<Option<Bundle>> {
        let read_txn = self.db.begin_read()?;
        let rows = read_txn.open_table(BUNDLES_TABLE)?;
        let Some(value) = rows.get(id)? else {
            return Ok(None);
        };
        let mut bundle: Bundle = serde_json::from_slice(value.value())?;

        let contents = read_txn.open_table(BUNDLE_CONTENTS_TABLE)?;
        for result in contents.range((id, 0u32)..=(id, u32::MAX))? {
            let (_key, value) = result?;
            let row: BundleContentRow = serde_json::from_slice(value.value())?;
            bundle.contents.push(row.into_ref(catalog));
        }
        Ok(Some(bundle))
    }

    /// All bundles, newest first
    pub fn list(&self, catalog: &dyn CatalogSource) -> StorageResult<Vec<Bundle>> {
        let ids: Vec<String> = {
            let read_txn = self.db.begin_read()?;
            let rows = read_txn.open_table(BUNDLES_TABLE)?;
            let mut ids = Vec::new();
            for result in rows.iter()? {
                let (key, _value) = result?;
                ids.push(key.value().to_string());
            }
            ids
        };

        let mut bundles = Vec::new();
        for id in ids {
            if let Some(bundle) = self.get(&id, catalog)? {
                bundles.push(bundle);
            }
        }
        bundles.sort_by_key(|b| std::cmp::Reverse(b.id.parse::<i64>().unwrap_or(0)));
        Ok(bundles)
    }

    /// Bundles the storefront may show under the current event toggle
    pub fn list_presentable(&self, catalog: &dyn CatalogSource) -> StorageResult<Vec<Bundle>> {
        let event_active = self.event_active()?;
        Ok(self
            .list(catalog)?
            .into_iter()
            .filter(|b| b.is_presentable(event_active))
            .collect())
    }

    /// Delete a bundle and all of its content refs
    ///
    /// Contents go first, then the parent row, inside one transaction, so
    /// a dangling content ref is never observable.
    pub fn delete(&self, id: &str) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut contents = txn.open_table(BUNDLE_CONTENTS_TABLE)?;
            remove_content_rows(&mut contents, id)?;

            let mut rows = txn.open_table(BUNDLES_TABLE)?;
            if rows.remove(id)?.is_none() {
                return Err(StorageError::BundleNotFound(id.to_string()));
            }
        }
        txn.commit()?;
        debug!(bundle_id = %id, "bundle deleted");
        Ok(())
    }

    // ========== Promotional event toggle ==========

    pub fn set_event_active(&self, active: bool) -> StorageResult<()> {
        let bytes = serde_json::to_vec(&active)?;
        let txn = self.db.begin_write()?;
        {
            let mut settings = txn.open_table(SETTINGS_TABLE)?;
            settings.insert(EVENT_ACTIVE_KEY, bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Whether the promotional event is on; defaults to off when unset
    pub fn event_active(&self) -> StorageResult<bool> {
        let read_txn = self.db.begin_read()?;
        let settings = read_txn.open_table(SETTINGS_TABLE)?;
        match settings.get(EVENT_ACTIVE_KEY)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Ok(false),
        }
    }

    /// Raw content rows for a bundle id (orphan checks in tests)
    #[cfg(test)]
    pub(crate) fn content_row_count(&self, id: &str) -> StorageResult<usize> {
        let read_txn = self.db.begin_read()?;
        let contents = read_txn.open_table(BUNDLE_CONTENTS_TABLE)?;
        let mut count = 0;
        for result in contents.range((id, 0u32)..=(id, u32::MAX))? {
            result?;
            count += 1;
        }
        Ok(count)
    }
}

/// Remove every content row belonging to a bundle
fn remove_content_rows(
    table: &mut redb::Table<'_, (&'static str, u32), &'static [u8]>,
    bundle_id: &str,
) -> StorageResult<()> {
    // Collect keys first to avoid borrowing the table across the removal
    let mut keys_to_remove: Vec<u32> = Vec::new();
    for result in table.range((bundle_id, 0u32)..=(bundle_id, u32::MAX))? {
        let (key, _value) = result?;
        keys_to_remove.push(key.value().1);
    }
    for idx in keys_to_remove {
        table.remove((bundle_id, idx))?;
    }
    Ok(())
}
