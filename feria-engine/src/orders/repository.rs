//! Order persistence

use async_trait::async_trait;
use redb::ReadableTable;
use tracing::debug;

use crate::storage::{ORDERS_TABLE, StorageError, StorageResult, StoreDb};
use shared::models::{Order, OrderStatus};

/// Persistence seam for orders
///
/// The board talks to storage only through this trait so tests can swap in
/// a failing backend and exercise rollback.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert(&self, order: &Order) -> StorageResult<()>;
    /// All orders, newest first
    async fn fetch_all(&self) -> StorageResult<Vec<Order>>;
    async fn update_status(&self, id: &str, status: OrderStatus) -> StorageResult<()>;
    async fn set_notified(&self, id: &str, notified: bool) -> StorageResult<()>;
    /// Removing an order that is already gone is not an error
    async fn delete(&self, id: &str) -> StorageResult<()>;
}

/// Order store backed by redb
#[derive(Clone)]
pub struct RedbOrderRepository {
    db: StoreDb,
}

impl RedbOrderRepository {
    pub fn new(db: StoreDb) -> Self {
        Self { db }
    }

    fn write_order(&self, order: &Order) -> StorageResult<()> {
        let bytes = serde_json::to_vec(order)?;
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(ORDERS_TABLE)?;
            table.insert(order.id.as_str(), bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    fn read_order(&self, id: &str) -> StorageResult<Order> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        let Some(value) = table.get(id)? else {
            return Err(StorageError::OrderNotFound(id.to_string()));
        };
        Ok(serde_json::from_slice(value.value())?)
    }
}

#[async_trait]
impl OrderRepository for RedbOrderRepository {
    async fn insert(&self, order: &Order) -> StorageResult<()> {
        self.write_order(order)?;
        debug!(order_id = %order.id, "order inserted");
        Ok(())
    }

    async fn fetch_all(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            orders.push(serde_json::from_slice::<Order>(value.value())?);
        }
        orders.sort_by_key(|o| std::cmp::Reverse(o.created_at));
        Ok(orders)
    }

    async fn update_status(&self, id: &str, status: OrderStatus) -> StorageResult<()> {
        let mut order = self.read_order(id)?;
        order.status = status;
        self.write_order(&order)?;
        debug!(order_id = %id, status = %status, "order status updated");
        Ok(())
    }

    async fn set_notified(&self, id: &str, notified: bool) -> StorageResult<()> {
        let mut order = self.read_order(id)?;
        order.notified_via_messenger = notified;
        self.write_order(&order)
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(ORDERS_TABLE)?;
            table.remove(id)?;
        }
        txn.commit()?;
        debug!(order_id = %id, "order deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: &str, created_at: i64) -> Order {
        Order {
            id: id.to_string(),
            created_at,
            customer_name: "Ana".to_string(),
            phone: "+56911111111".to_string(),
            address: None,
            lines: vec![],
            total: "95.00".parse().unwrap(),
            status: OrderStatus::Pending,
            notified_via_messenger: false,
        }
    }

    #[tokio::test]
    async fn test_fetch_all_is_newest_first() {
        let repo = RedbOrderRepository::new(StoreDb::open_in_memory().unwrap());
        repo.insert(&order("a", 100)).await.unwrap();
        repo.insert(&order("b", 300)).await.unwrap();
        repo.insert(&order("c", 200)).await.unwrap();

        let orders = repo.fetch_all().await.unwrap();
        let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[tokio::test]
    async fn test_update_status_persists_the_store_token() {
        let repo = RedbOrderRepository::new(StoreDb::open_in_memory().unwrap());
        repo.insert(&order("a", 100)).await.unwrap();
        repo.update_status("a", OrderStatus::InProgress).await.unwrap();

        let raw = {
            let read_txn = repo.db.begin_read().unwrap();
            let table = read_txn.open_table(ORDERS_TABLE).unwrap();
            let value = table.get("a").unwrap().unwrap();
            String::from_utf8(value.value().to_vec()).unwrap()
        };
        assert!(raw.contains("\"estado\":\"en proceso\""));
    }

    #[tokio::test]
    async fn test_update_status_on_missing_order_errors() {
        let repo = RedbOrderRepository::new(StoreDb::open_in_memory().unwrap());
        assert!(matches!(
            repo.update_status("nope", OrderStatus::Delivered).await,
            Err(StorageError::OrderNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let repo = RedbOrderRepository::new(StoreDb::open_in_memory().unwrap());
        repo.insert(&order("a", 100)).await.unwrap();
        repo.delete("a").await.unwrap();
        repo.delete("a").await.unwrap();
        assert!(repo.fetch_all().await.unwrap().is_empty());
    }
}
