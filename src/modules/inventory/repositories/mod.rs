pub mod inventory_repository;

pub(crate) use inventory_repository::reduce_stock_in_tx;
pub use inventory_repository::{InventoryRepository, MySqlInventoryRepository};
