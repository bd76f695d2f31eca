//! redb-backed persistence layer
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `cart` | fixed key `"cart"` | JSON `Vec<CartLine>` | persisted cart collection |
//! | `bundles` | bundle id | JSON bundle row | bundle rows |
//! | `bundle_contents` | `(bundle_id, idx)` | JSON content row | bundle child refs |
//! | `orders` | order id | JSON `Order` | order records |
//! | `settings` | setting key | JSON value | global toggles (promo event) |
//!
//! Values are JSON-serialized so the persisted schema tokens stay
//! inspectable and stable. Commits are durable as soon as `commit()`
//! returns; the database file is always in a consistent state.

use redb::{Database, TableDefinition};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Persisted cart collection: key = fixed `"cart"`, value = JSON Vec<CartLine>
pub(crate) const CART_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("cart");

/// Bundle rows: key = bundle id, value = JSON bundle row (no contents)
pub(crate) const BUNDLES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("bundles");

/// Bundle content refs: key = (bundle_id, position), value = JSON content row
pub(crate) const BUNDLE_CONTENTS_TABLE: TableDefinition<(&str, u32), &[u8]> =
    TableDefinition::new("bundle_contents");

/// Order records: key = order id, value = JSON Order
pub(crate) const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Global settings: key = setting name, value = JSON value
pub(crate) const SETTINGS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("settings");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("order not found: {0}")]
    OrderNotFound(String),

    #[error("bundle not found: {0}")]
    BundleNotFound(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Shared handle to the engine's redb database
#[derive(Clone)]
pub struct StoreDb {
    db: Arc<Database>,
}

impl StoreDb {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        // Create all tables up front so reads never hit a missing table
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CART_TABLE)?;
            let _ = write_txn.open_table(BUNDLES_TABLE)?;
            let _ = write_txn.open_table(BUNDLE_CONTENTS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(SETTINGS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    pub(crate) fn begin_write(&self) -> StorageResult<redb::WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Begin a read transaction
    pub(crate) fn begin_read(&self) -> StorageResult<redb::ReadTransaction> {
        use redb::ReadableDatabase;
        Ok(self.db.begin_read()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redb::ReadableTable;

    #[test]
    fn test_open_creates_all_tables() {
        let db = StoreDb::open_in_memory().unwrap();
        let read_txn = db.begin_read().unwrap();
        // Opening each table proves init created it
        read_txn.open_table(CART_TABLE).unwrap();
        read_txn.open_table(BUNDLES_TABLE).unwrap();
        read_txn.open_table(BUNDLE_CONTENTS_TABLE).unwrap();
        read_txn.open_table(ORDERS_TABLE).unwrap();
        read_txn.open_table(SETTINGS_TABLE).unwrap();
    }

    #[test]
    fn test_open_on_disk_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feria.redb");
        {
            let db = StoreDb::open(&path).unwrap();
            let txn = db.begin_write().unwrap();
            {
                let mut table = txn.open_table(SETTINGS_TABLE).unwrap();
                table.insert("probe", b"true".as_slice()).unwrap();
            }
            txn.commit().unwrap();
        }
        let db = StoreDb::open(&path).unwrap();
        let read_txn = db.begin_read().unwrap();
        let table = read_txn.open_table(SETTINGS_TABLE).unwrap();
        assert!(table.get("probe").unwrap().is_some());
    }
}
