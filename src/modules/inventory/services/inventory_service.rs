use std::sync::Arc;

use crate::core::{AppError, Result};
use crate::modules::inventory::models::{
    CreateInventoryItemRequest, InventoryItem, NewInventoryItem, StockDeduction,
    UpdateInventoryItemRequest,
};
use crate::modules::inventory::repositories::InventoryRepository;

/// Service for the product and service catalog
pub struct InventoryService {
    inventory_repo: Arc<dyn InventoryRepository>,
}

impl InventoryService {
    pub fn new(inventory_repo: Arc<dyn InventoryRepository>) -> Self {
        Self { inventory_repo }
    }

    /// Active rows only
    pub async fn list_inventory(&self) -> Result<Vec<InventoryItem>> {
        self.inventory_repo.list_active().await
    }

    pub async fn get_item(&self, id: i64) -> Result<InventoryItem> {
        self.inventory_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Inventory item {} not found", id)))
    }

    /// Lookup used by the barcode scanner at the counter
    pub async fn get_by_barcode(&self, barcode: &str) -> Result<InventoryItem> {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return Err(AppError::validation("Barcode cannot be empty"));
        }

        self.inventory_repo
            .find_by_barcode(barcode)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("No inventory item with barcode '{}'", barcode))
            })
    }

    pub async fn create_item(&self, request: CreateInventoryItemRequest) -> Result<InventoryItem> {
        let new_item = NewInventoryItem::from_request(request)?;
        let item = self.inventory_repo.create(new_item).await?;

        tracing::info!(
            inventory_id = item.id,
            name = %item.name,
            barcode = item.barcode.as_deref().unwrap_or(""),
            is_service = item.is_service,
            "Inventory item created"
        );

        Ok(item)
    }

    pub async fn update_item(
        &self,
        id: i64,
        changes: UpdateInventoryItemRequest,
    ) -> Result<InventoryItem> {
        changes.validate()?;
        let item = self.inventory_repo.update(id, &changes).await?;

        tracing::info!(inventory_id = id, "Inventory item updated");

        Ok(item)
    }

    /// Soft delete: the row stays for invoice history but leaves the catalog
    pub async fn delete_item(&self, id: i64) -> Result<()> {
        self.inventory_repo.deactivate(id).await?;

        tracing::info!(inventory_id = id, "Inventory item deactivated");

        Ok(())
    }

    /// Standalone stock reduction, outside of any invoice
    pub async fn reduce_stock(&self, id: i64, quantity: i32) -> Result<InventoryItem> {
        let deduction = StockDeduction::new(id, quantity)?;

        match self.inventory_repo.reduce_stock(deduction).await {
            Ok(item) => {
                tracing::debug!(
                    inventory_id = id,
                    quantity,
                    remaining = ?item.quantity,
                    "Stock reduced"
                );
                Ok(item)
            }
            Err(e @ AppError::InsufficientStock { .. }) => {
                tracing::warn!(inventory_id = id, quantity, error = %e, "Stock reduction rejected");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}
