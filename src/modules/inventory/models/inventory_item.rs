// Inventory rows cover both physical products (tracked stock) and billable
// services such as washes (`is_service`), which have unlimited availability
// and are never stock-checked or decremented.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{money, AppError, Result};

/// A product or service offered by the shop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,

    /// Unique when present; services get a generated four-digit code
    pub barcode: Option<String>,

    /// Units on hand; meaningless for services
    pub quantity: Option<i32>,

    /// Reorder threshold
    pub min_quantity: Option<i32>,

    pub price: Decimal,
    pub supplier: Option<String>,
    pub category: Option<String>,
    pub is_service: bool,

    /// Soft-delete flag
    pub active: bool,
}

impl InventoryItem {
    pub fn on_hand(&self) -> i32 {
        self.quantity.unwrap_or(0)
    }

    /// Physical product at or below its reorder threshold
    pub fn is_low_stock(&self) -> bool {
        match (self.is_service, self.min_quantity) {
            (false, Some(min)) => self.on_hand() <= min,
            _ => false,
        }
    }

    /// Checks whether `requested` units can be taken and returns the
    /// quantity left afterwards. Services are untracked: they always pass and
    /// report `None`.
    pub fn remaining_after(&self, requested: i32) -> Result<Option<i32>> {
        if self.is_service {
            return Ok(None);
        }

        let on_hand = self.on_hand();
        if on_hand < requested {
            return Err(AppError::insufficient_stock(&self.name, requested, on_hand));
        }

        Ok(Some(on_hand - requested))
    }
}

/// POST /inventory body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInventoryItemRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub min_quantity: Option<i32>,
    pub price: Decimal,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_service: bool,
    #[serde(default)]
    pub active: Option<bool>,
}

/// A validated row ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewInventoryItem {
    pub name: String,
    pub description: Option<String>,
    pub barcode: Option<String>,
    pub quantity: Option<i32>,
    pub min_quantity: Option<i32>,
    pub price: Decimal,
    pub supplier: Option<String>,
    pub category: Option<String>,
    pub is_service: bool,
    pub active: bool,
}

impl NewInventoryItem {
    pub fn from_request(request: CreateInventoryItemRequest) -> Result<Self> {
        let name = request.name.trim().to_string();
        validate_name(&name)?;
        money::validate_amount("Price", request.price)?;
        validate_count("Quantity", request.quantity)?;
        validate_count("Minimum quantity", request.min_quantity)?;

        let quantity = match (request.is_service, request.quantity) {
            (false, None) => Some(0),
            (_, quantity) => quantity,
        };

        Ok(Self {
            name,
            description: non_blank(request.description),
            barcode: non_blank(request.barcode),
            quantity,
            min_quantity: request.min_quantity,
            price: money::round(request.price),
            supplier: non_blank(request.supplier),
            category: non_blank(request.category),
            is_service: request.is_service,
            active: request.active.unwrap_or(true),
        })
    }

    /// Services created without a barcode get the next service code
    pub fn needs_service_code(&self) -> bool {
        self.is_service && self.barcode.is_none()
    }

    pub fn into_item(self, id: i64) -> InventoryItem {
        InventoryItem {
            id,
            name: self.name,
            description: self.description,
            barcode: self.barcode,
            quantity: self.quantity,
            min_quantity: self.min_quantity,
            price: self.price,
            supplier: self.supplier,
            category: self.category,
            is_service: self.is_service,
            active: self.active,
        }
    }
}

/// PUT /inventory/{id} body; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInventoryItemRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub min_quantity: Option<i32>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_service: Option<bool>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl UpdateInventoryItemRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name(name.trim())?;
        }
        if let Some(price) = self.price {
            money::validate_amount("Price", price)?;
        }
        validate_count("Quantity", self.quantity)?;
        validate_count("Minimum quantity", self.min_quantity)?;
        Ok(())
    }

    /// Merge the changes into an existing row
    pub fn apply_to(&self, item: &mut InventoryItem) {
        if let Some(name) = &self.name {
            item.name = name.trim().to_string();
        }
        if let Some(description) = &self.description {
            item.description = non_blank(Some(description.clone()));
        }
        if let Some(barcode) = &self.barcode {
            item.barcode = non_blank(Some(barcode.clone()));
        }
        if let Some(quantity) = self.quantity {
            item.quantity = Some(quantity);
        }
        if let Some(min_quantity) = self.min_quantity {
            item.min_quantity = Some(min_quantity);
        }
        if let Some(price) = self.price {
            item.price = money::round(price);
        }
        if let Some(supplier) = &self.supplier {
            item.supplier = non_blank(Some(supplier.clone()));
        }
        if let Some(category) = &self.category {
            item.category = non_blank(Some(category.clone()));
        }
        if let Some(is_service) = self.is_service {
            item.is_service = is_service;
        }
        if let Some(active) = self.active {
            item.active = active;
        }
    }
}

/// Four-digit code for the next service: one past the highest numeric
/// barcode already used by a service
pub fn next_service_code<'a>(existing: impl IntoIterator<Item = &'a str>) -> String {
    let highest = existing
        .into_iter()
        .filter(|code| !code.is_empty() && code.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|code| code.parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    format!("{:04}", highest.saturating_add(1))
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(AppError::validation("Name cannot be empty"));
    }
    if name.chars().count() > 255 {
        return Err(AppError::validation("Name cannot exceed 255 characters"));
    }
    Ok(())
}

fn validate_count(field: &str, value: Option<i32>) -> Result<()> {
    if let Some(value) = value {
        if value < 0 {
            return Err(AppError::validation(format!(
                "{} cannot be negative, got: {}",
                field, value
            )));
        }
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
