use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

/// One `{id, quantity}` entry of an invoice's `inventoryItems` list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockDeductionRequest {
    pub id: i64,
    pub quantity: i32,
}

/// POST /inventory/{id}/reduce-stock body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReduceStockRequest {
    pub quantity: i32,
}

/// Units to take from one inventory row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockDeduction {
    pub inventory_id: i64,
    pub quantity: i32,
}

impl StockDeduction {
    pub fn new(inventory_id: i64, quantity: i32) -> Result<Self> {
        if quantity < 1 {
            return Err(AppError::validation(format!(
                "Stock deduction for item {} must be at least 1, got: {}",
                inventory_id, quantity
            )));
        }

        Ok(Self {
            inventory_id,
            quantity,
        })
    }

    /// Validate the requested deductions, merge repeated ids and order them by
    /// id. Stores lock rows in this order, so concurrent invoices touching the
    /// same products always acquire locks in the same sequence.
    pub fn consolidate(requests: &[StockDeductionRequest]) -> Result<Vec<StockDeduction>> {
        let mut merged: BTreeMap<i64, i32> = BTreeMap::new();

        for request in requests {
            let deduction = StockDeduction::new(request.id, request.quantity)?;
            let entry = merged.entry(deduction.inventory_id).or_insert(0);
            *entry = entry.checked_add(deduction.quantity).ok_or_else(|| {
                AppError::validation(format!(
                    "Stock deduction for item {} is too large",
                    deduction.inventory_id
                ))
            })?;
        }

        Ok(merged
            .into_iter()
            .map(|(inventory_id, quantity)| StockDeduction {
                inventory_id,
                quantity,
            })
            .collect())
    }
}
