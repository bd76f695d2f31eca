//! Order board with optimistic updates
//!
//! The board keeps the in-memory order list the console renders from.
//! Every mutation is applied locally first, then written through the
//! repository; when the write fails the local change is undone, so the
//! list never drifts from storage for longer than one failed call.

use tracing::{debug, warn};

use crate::orders::OrderRepository;
use crate::storage::StorageResult;
use shared::models::{Order, OrderStatus};
use shared::{StoreError, StoreResult};

/// A captured status transition that knows how to undo itself
///
/// Holding the previous status in the same value that performs the update
/// makes rollback a structural guarantee rather than a call-site
/// convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub order_id: String,
    pub previous: OrderStatus,
    pub next: OrderStatus,
}

impl StatusChange {
    pub fn capture(order: &Order, next: OrderStatus) -> Self {
        Self {
            order_id: order.id.clone(),
            previous: order.status,
            next,
        }
    }

    pub fn apply(&self, order: &mut Order) {
        order.status = self.next;
    }

    pub fn rollback(&self, order: &mut Order) {
        order.status = self.previous;
    }
}

/// In-memory order list over a repository
pub struct OrderBoard<R: OrderRepository> {
    orders: Vec<Order>,
    repo: R,
}

impl<R: OrderRepository> OrderBoard<R> {
    /// Hydrate the board from storage
    pub async fn load(repo: R) -> StorageResult<Self> {
        let orders = repo.fetch_all().await?;
        Ok(Self { orders, repo })
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn get(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    /// Add a freshly composed order to the board and persist it
    pub async fn place(&mut self, order: Order) -> StoreResult<()> {
        self.orders.insert(0, order.clone());
        if let Err(e) = self.repo.insert(&order).await {
            self.orders.remove(0);
            warn!(order_id = %order.id, error = %e, "order insert failed, rolled back");
            return Err(StoreError::persistence(e.to_string()));
        }
        Ok(())
    }

    /// Move an order to `next`, rolling the board back if the write fails
    ///
    /// Transitions outside the usual `pendiente → en proceso → entregado`
    /// flow are allowed (the operator may need to fix a mistake) but
    /// logged.
    pub async fn change_status(&mut self, id: &str, next: OrderStatus) -> StoreResult<()> {
        let idx = self.index_of(id)?;
        let change = StatusChange::capture(&self.orders[idx], next);
        if !change.previous.follows_lifecycle(next) {
            debug!(order_id = %id, from = %change.previous, to = %next, "off-lifecycle status change");
        }
        change.apply(&mut self.orders[idx]);
        if let Err(e) = self.repo.update_status(id, next).await {
            change.rollback(&mut self.orders[idx]);
            warn!(order_id = %id, error = %e, "status update failed, rolled back");
            return Err(StoreError::persistence(e.to_string()));
        }
        Ok(())
    }

    /// Record that the fulfillment message was handed off
    pub async fn mark_notified(&mut self, id: &str) -> StoreResult<()> {
        let idx = self.index_of(id)?;
        let previous = self.orders[idx].notified_via_messenger;
        self.orders[idx].notified_via_messenger = true;
        if let Err(e) = self.repo.set_notified(id, true).await {
            self.orders[idx].notified_via_messenger = previous;
            warn!(order_id = %id, error = %e, "notified flag update failed, rolled back");
            return Err(StoreError::persistence(e.to_string()));
        }
        Ok(())
    }

    /// Remove an order; on write failure it returns to its original slot
    pub async fn delete_order(&mut self, id: &str) -> StoreResult<()> {
        let idx = self.index_of(id)?;
        let removed = self.orders.remove(idx);
        if let Err(e) = self.repo.delete(id).await {
            self.orders.insert(idx, removed);
            warn!(order_id = %id, error = %e, "order delete failed, rolled back");
            return Err(StoreError::persistence(e.to_string()));
        }
        Ok(())
    }

    fn index_of(&self, id: &str) -> StoreResult<usize> {
        self.orders
            .iter()
            .position(|o| o.id == id)
            .ok_or_else(|| StoreError::validation(format!("unknown order: {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::RedbOrderRepository;
    use crate::storage::{StorageError, StoreDb};
    use async_trait::async_trait;

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

    /// Backend whose writes all fail; reads work on a fixed list.
    struct FailingRepository {
        orders: Vec<Order>,
    }

    impl FailingRepository {
        fn error() -> StorageError {
            let cause = serde_json::from_str::<serde_json::Value>("").unwrap_err();
            StorageError::Serialization(cause)
        }
    }

    #[async_trait]
    impl OrderRepository for FailingRepository {
        async fn insert(&self, _order: &Order) -> StorageResult<()> {
            Err(Self::error())
        }
        async fn fetch_all(&self) -> StorageResult<Vec<Order>> {
            Ok(self.orders.clone())
        }
        async fn update_status(&self, _id: &str, _status: OrderStatus) -> StorageResult<()> {
            Err(Self::error())
        }
        async fn set_notified(&self, _id: &str, _notified: bool) -> StorageResult<()> {
            Err(Self::error())
        }
        async fn delete(&self, _id: &str) -> StorageResult<()> {
            Err(Self::error())
        }
    }

    #[tokio::test]
    async fn test_change_status_round_trips_through_storage() {
        let repo = RedbOrderRepository::new(StoreDb::open_in_memory().unwrap());
        let mut board = OrderBoard::load(repo.clone()).await.unwrap();
        board.place(order("a", 100)).await.unwrap();
        board.change_status("a", OrderStatus::InProgress).await.unwrap();

        assert_eq!(board.get("a").unwrap().status, OrderStatus::InProgress);
        // A fresh board sees the persisted status.
        let rehydrated = OrderBoard::load(repo).await.unwrap();
        assert_eq!(rehydrated.get("a").unwrap().status, OrderStatus::InProgress);
    }

    #[tokio::test]
    async fn test_failed_status_write_rolls_back_completely() {
        let repo = FailingRepository {
            orders: vec![order("a", 100)],
        };
        let mut board = OrderBoard::load(repo).await.unwrap();

        let result = board.change_status("a", OrderStatus::InProgress).await;
        assert!(matches!(result, Err(StoreError::Persistence { .. })));
        assert_eq!(board.get("a").unwrap().status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_failed_place_leaves_board_unchanged() {
        let repo = FailingRepository { orders: vec![] };
        let mut board = OrderBoard::load(repo).await.unwrap();

        assert!(board.place(order("a", 100)).await.is_err());
        assert!(board.orders().is_empty());
    }

    #[tokio::test]
    async fn test_failed_delete_restores_original_position() {
        let repo = FailingRepository {
            orders: vec![order("a", 300), order("b", 200), order("c", 100)],
        };
        let mut board = OrderBoard::load(repo).await.unwrap();

        assert!(board.delete_order("b").await.is_err());
        let ids: Vec<&str> = board.orders().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_mark_notified_rolls_back_on_failure() {
        let repo = FailingRepository {
            orders: vec![order("a", 100)],
        };
        let mut board = OrderBoard::load(repo).await.unwrap();

        assert!(board.mark_notified("a").await.is_err());
        assert!(!board.get("a").unwrap().notified_via_messenger);

        let repo = RedbOrderRepository::new(StoreDb::open_in_memory().unwrap());
        let mut board = OrderBoard::load(repo).await.unwrap();
        board.place(order("a", 100)).await.unwrap();
        board.mark_notified("a").await.unwrap();
        assert!(board.get("a").unwrap().notified_via_messenger);
    }

    #[tokio::test]
    async fn test_unknown_order_is_a_validation_error() {
        let repo = FailingRepository { orders: vec![] };
        let mut board = OrderBoard::load(repo).await.unwrap();
        let err = board.change_status("ghost", OrderStatus::Delivered).await.unwrap_err();
        assert!(err.is_validation());
    }
}
