//! Order storage and the console order board

mod repository;
mod workflow;

pub use repository::{OrderRepository, RedbOrderRepository};
pub use workflow::{OrderBoard, StatusChange};
