// An invoice item is a priced line on a receipt. `service_name` is a free-text
// snapshot taken at sale time, not a reference into the inventory, so later
// renames or price changes never rewrite history. Items are immutable once
// the invoice is stored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{money, AppError, Result};

/// A persisted invoice line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub id: i64,

    /// Owning invoice
    pub invoice_id: i64,

    pub service_name: String,

    pub quantity: i32,

    pub unit_price: Decimal,

    /// quantity × unit_price, two decimals
    pub total: Decimal,
}

/// A validated line waiting to be stored with its invoice
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceItemDraft {
    pub service_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total: Decimal,
}

impl InvoiceItemDraft {
    /// Create a new line with validation
    ///
    /// # Arguments
    /// * `service_name` - Service or product name shown on the receipt (max 255 chars)
    /// * `quantity` - Must be at least 1
    /// * `unit_price` - Must be non-negative, at most two decimals
    pub fn new(service_name: String, quantity: i32, unit_price: Decimal) -> Result<Self> {
        let service_name = service_name.trim().to_string();
        Self::validate_service_name(&service_name)?;
        Self::validate_quantity(quantity)?;
        money::validate_amount("Unit price", unit_price)?;

        Ok(Self {
            total: Self::line_total(quantity, unit_price)?,
            unit_price: money::round(unit_price),
            service_name,
            quantity,
        })
    }

    /// Formula: total = quantity × unit_price, rounded to two decimals.
    /// A total beyond `money::MAX_AMOUNT` is a validation error.
    pub fn line_total(quantity: i32, unit_price: Decimal) -> Result<Decimal> {
        let total = money::checked_mul("Line total", Decimal::from(quantity), unit_price)?;
        money::ensure_storable("Line total", money::round(total))
    }

    /// Attach the ids assigned by the store
    pub fn into_item(self, id: i64, invoice_id: i64) -> InvoiceItem {
        InvoiceItem {
            id,
            invoice_id,
            service_name: self.service_name,
            quantity: self.quantity,
            unit_price: self.unit_price,
            total: self.total,
        }
    }

    fn validate_service_name(service_name: &str) -> Result<()> {
        if service_name.is_empty() {
            return Err(AppError::validation("Service name cannot be empty"));
        }

        if service_name.chars().count() > 255 {
            return Err(AppError::validation(
                "Service name cannot exceed 255 characters",
            ));
        }

        Ok(())
    }

    fn validate_quantity(quantity: i32) -> Result<()> {
        if quantity < 1 {
            return Err(AppError::validation(format!(
                "Quantity must be at least 1, got: {}",
                quantity
            )));
        }

        Ok(())
    }
}
