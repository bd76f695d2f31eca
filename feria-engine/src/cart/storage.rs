//! Persisted cart collection
//!
//! The whole cart is one JSON array stored under a fixed key. Absent or
//! unparsable data loads as an empty cart, never an error: losing a cart
//! is low severity and must not break the session.

use redb::ReadableTable;
use shared::models::CartLine;
use tracing::warn;

use crate::storage::{CART_TABLE, StorageResult, StoreDb};

/// Fixed storage key for the cart collection
const CART_KEY: &str = "cart";

/// Durable storage for the cart collection
pub trait CartStorage {
    /// Load the persisted cart; corrupt or missing state yields an empty cart
    fn load(&self) -> Vec<CartLine>;

    /// Persist the full collection
    fn save(&self, lines: &[CartLine]) -> StorageResult<()>;
}

/// redb-backed cart storage
#[derive(Clone)]
pub struct RedbCartStorage {
    db: StoreDb,
}

impl RedbCartStorage {
    pub fn new(db: StoreDb) -> Self {
        Self { db }
    }

    fn try_load(&self) -> StorageResult<Vec<CartLine>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CART_TABLE)?;
        match table.get(CART_KEY)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Ok(Vec::new()),
        }
    }
}

impl CartStorage for RedbCartStorage {
    fn load(&self) -> Vec<CartLine> {
        match self.try_load() {
            Ok(lines) => lines,
            Err(err) => {
                warn!(error = %err, "persisted cart unreadable, starting empty");
                Vec::new()
            }
        }
    }

    fn save(&self, lines: &[CartLine]) -> StorageResult<()> {
        let bytes = serde_json::to_vec(lines)?;
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(CART_TABLE)?;
            table.insert(CART_KEY, bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{CartLine, LineKind, line_id};

    fn line(source_id: &str, kind: LineKind, price: &str, quantity: i32) -> CartLine {
        CartLine {
            line_id: line_id(source_id, kind),
            kind,
            source_id: source_id.to_string(),
            display_name: source_id.to_string(),
            unit_price: price.parse().unwrap(),
            quantity,
            image_ref: None,
            bundle_contents: None,
        }
    }

    #[test]
    fn test_missing_state_loads_empty() {
        let storage = RedbCartStorage::new(StoreDb::open_in_memory().unwrap());
        assert!(storage.load().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let storage = RedbCartStorage::new(StoreDb::open_in_memory().unwrap());
        let lines = vec![
            line("rice", LineKind::Box, "40.00", 2),
            line("tea", LineKind::Unit, "2.50", 1),
        ];
        storage.save(&lines).unwrap();
        assert_eq!(storage.load(), lines);
    }

    #[test]
    fn test_corrupt_state_loads_empty() {
        let db = StoreDb::open_in_memory().unwrap();
        let txn = db.begin_write().unwrap();
        {
            let mut table = txn.open_table(CART_TABLE).unwrap();
            table.insert(CART_KEY, b"not valid json".as_slice()).unwrap();
        }
        txn.commit().unwrap();

        let storage = RedbCartStorage::new(db);
        assert!(storage.load().is_empty());
    }
}
