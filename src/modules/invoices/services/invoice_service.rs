use std::sync::Arc;

use crate::core::{money, AppError, Result};
use crate::modules::inventory::models::StockDeduction;
use crate::modules::invoices::models::{
    CreateInvoiceRequest, Invoice, InvoiceDraft, InvoiceNumber, InvoiceStatus, InvoiceWithItems,
};
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::taxes::TaxCalculator;

/// Service for invoice business logic
pub struct InvoiceService {
    invoice_repo: Arc<dyn InvoiceRepository>,
    tax_calculator: TaxCalculator,
}

impl InvoiceService {
    pub fn new(invoice_repo: Arc<dyn InvoiceRepository>, tax_calculator: TaxCalculator) -> Self {
        Self {
            invoice_repo,
            tax_calculator,
        }
    }

    /// Checkout: validate the request, compute totals, then hand the draft and
    /// its stock deductions to the store as one atomic unit.
    ///
    /// # Returns
    /// * `Result<InvoiceWithItems>` - Stored invoice with number and items;
    ///   on any error nothing is persisted and no stock moves
    pub async fn create_invoice(&self, request: CreateInvoiceRequest) -> Result<InvoiceWithItems> {
        let draft = InvoiceDraft::from_request(&request, &self.tax_calculator)?;
        let deductions =
            StockDeduction::consolidate(request.inventory_items.as_deref().unwrap_or_default())?;

        match self.invoice_repo.create(&draft, &deductions).await {
            Ok(created) => {
                tracing::info!(
                    invoice_id = created.invoice.id,
                    number = %created.invoice.number,
                    total = %money::format_amount(created.invoice.total),
                    items = created.items.len(),
                    deductions = deductions.len(),
                    "Invoice created"
                );
                Ok(created)
            }
            Err(e @ (AppError::InsufficientStock { .. } | AppError::NotFound(_))) => {
                tracing::warn!(
                    customer = %draft.customer_name,
                    error = %e,
                    "Invoice rejected by stock check"
                );
                Err(e)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to store invoice");
                Err(e)
            }
        }
    }

    /// Get invoice by ID with its items
    pub async fn get_invoice(&self, id: i64) -> Result<InvoiceWithItems> {
        self.invoice_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invoice {} not found", id)))
    }

    /// Newest first
    pub async fn list_invoices(&self) -> Result<Vec<Invoice>> {
        self.invoice_repo.list().await
    }

    /// Move an invoice along its lifecycle (pending → paid → cancelled)
    pub async fn update_status(&self, id: i64, status: InvoiceStatus) -> Result<Invoice> {
        let invoice = self.invoice_repo.update_status(id, status).await?;

        tracing::info!(
            invoice_id = id,
            number = %invoice.number,
            status = %status,
            "Invoice status updated"
        );

        Ok(invoice)
    }

    /// Reserve a number without creating an invoice
    pub async fn next_invoice_number(&self) -> Result<InvoiceNumber> {
        self.invoice_repo.next_invoice_number().await
    }
}
