// An invoice is a customer receipt: denormalized customer fields, the priced
// lines, and money fields computed once at creation. After that only the
// status may change, and invoices are never deleted.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::invoice_item::{InvoiceItem, InvoiceItemDraft};
use crate::core::{money, AppError, Result};
use crate::modules::inventory::models::StockDeductionRequest;
use crate::modules::taxes::TaxCalculator;

/// Invoice status lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Issued, not yet paid
    #[default]
    Pending,

    /// Settled at the counter
    Paid,

    /// Voided
    Cancelled,
}

impl InvoiceStatus {
    /// Pending may move to Paid or Cancelled; a paid invoice may still be
    /// cancelled. Cancelled is terminal.
    pub fn can_transition_to(self, next: InvoiceStatus) -> bool {
        matches!(
            (self, next),
            (InvoiceStatus::Pending, InvoiceStatus::Paid)
                | (InvoiceStatus::Pending, InvoiceStatus::Cancelled)
                | (InvoiceStatus::Paid, InvoiceStatus::Cancelled)
        )
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvoiceStatus::Pending => write!(f, "pending"),
            InvoiceStatus::Paid => write!(f, "paid"),
            InvoiceStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            "cancelled" => Ok(InvoiceStatus::Cancelled),
            _ => Err(AppError::validation(format!("Invalid invoice status: {}", s))),
        }
    }
}

/// A stored invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: i64,

    /// Sequential receipt number, e.g. `001-0042`
    pub number: String,

    pub customer_name: String,

    pub customer_phone: Option<String>,

    /// RTN or ID number
    pub customer_tax_id: Option<String>,

    pub subtotal: Decimal,

    /// ISV charged on the subtotal
    pub tax: Decimal,

    /// subtotal + tax
    pub total: Decimal,

    pub status: InvoiceStatus,

    /// Business date of the sale
    pub date: NaiveDate,

    pub created_at: DateTime<Utc>,
}

/// Invoice together with its lines, the shape returned to receipt printing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceWithItems {
    pub invoice: Invoice,
    pub items: Vec<InvoiceItem>,
}

/// Money fields of an invoice. This is the only place the totals formula lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl InvoiceTotals {
    /// subtotal = Σ line totals; tax = subtotal × rate; total = subtotal + tax.
    /// Every field must fit the money columns, otherwise nothing is stored.
    pub fn compute(items: &[InvoiceItemDraft], tax: &TaxCalculator) -> Result<Self> {
        let subtotal = items.iter().try_fold(Decimal::ZERO, |sum, item| {
            money::checked_add("Subtotal", sum, item.total)
        })?;
        let subtotal = money::ensure_storable("Subtotal", money::round(subtotal))?;
        let tax = money::ensure_storable("Tax", tax.calculate_tax(subtotal)?)?;
        let total = money::checked_add("Total", subtotal, tax)?;
        let total = money::ensure_storable("Total", money::round(total))?;

        Ok(Self {
            subtotal,
            tax,
            total,
        })
    }
}

/// A validated invoice waiting for a number and an id
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_tax_id: Option<String>,
    pub date: NaiveDate,
    pub totals: InvoiceTotals,
    pub items: Vec<InvoiceItemDraft>,
}

impl InvoiceDraft {
    /// Validate a create request and compute its totals
    pub fn from_request(request: &CreateInvoiceRequest, tax: &TaxCalculator) -> Result<Self> {
        let customer_name = request.customer.name.trim().to_string();
        if customer_name.is_empty() {
            return Err(AppError::validation("Customer name cannot be empty"));
        }

        if request.items.is_empty() {
            return Err(AppError::validation(
                "Invoice must have at least one item",
            ));
        }

        let date = parse_business_date(&request.date)?;

        let items = request
            .items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                InvoiceItemDraft::new(item.service_name.clone(), item.quantity, item.unit_price)
                    .map_err(|e| match e {
                        AppError::Validation(msg) => {
                            AppError::validation(format!("Item {}: {}", idx + 1, msg))
                        }
                        other => other,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let totals = InvoiceTotals::compute(&items, tax)?;

        Ok(Self {
            customer_name,
            customer_phone: non_blank(request.customer.phone.as_deref()),
            customer_tax_id: non_blank(request.customer.tax_id.as_deref()),
            date,
            totals,
            items,
        })
    }

    /// Attach number, id and creation time assigned by the store
    pub fn into_invoice(&self, id: i64, number: String, created_at: DateTime<Utc>) -> Invoice {
        Invoice {
            id,
            number,
            customer_name: self.customer_name.clone(),
            customer_phone: self.customer_phone.clone(),
            customer_tax_id: self.customer_tax_id.clone(),
            subtotal: self.totals.subtotal,
            tax: self.totals.tax,
            total: self.totals.total,
            status: InvoiceStatus::Pending,
            date: self.date,
            created_at,
        }
    }
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_business_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.len() != 10 {
        return Err(AppError::validation(format!(
            "Date must use the YYYY-MM-DD format, got: {}",
            value
        )));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        AppError::validation(format!(
            "Date must use the YYYY-MM-DD format, got: {}",
            value
        ))
    })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// Request DTOs

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceItemRequest {
    pub service_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// POST /invoices body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    pub customer: CustomerRequest,
    pub items: Vec<CreateInvoiceItemRequest>,
    pub date: String,
    /// Stock bookkeeping only; independent of the priced `items`
    #[serde(default)]
    pub inventory_items: Option<Vec<StockDeductionRequest>>,
}

/// PUT /invoices/{id}/status body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateInvoiceStatusRequest {
    pub status: InvoiceStatus,
}
