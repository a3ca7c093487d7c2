mod inventory_item;
mod stock;

pub use inventory_item::{
    next_service_code, CreateInventoryItemRequest, InventoryItem, NewInventoryItem,
    UpdateInventoryItemRequest,
};
pub use stock::{ReduceStockRequest, StockDeduction, StockDeductionRequest};
