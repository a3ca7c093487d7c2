// Inventory module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{InventoryItem, StockDeduction};
pub use repositories::{InventoryRepository, MySqlInventoryRepository};
pub use services::InventoryService;
