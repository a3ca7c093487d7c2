// InvoiceRepository: storage interface for invoices and their items, plus the
// MySQL implementation.
//
// `create` is the whole checkout unit of work: stock deductions, number
// allocation, invoice row and item rows share one transaction. Any error drops
// the transaction before commit, which rolls every step back.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use rust_decimal::Decimal;
use sqlx::{MySqlConnection, MySqlPool};

use crate::core::{AppError, Result};
use crate::modules::inventory::models::StockDeduction;
use crate::modules::inventory::repositories::reduce_stock_in_tx;
use crate::modules::invoices::models::{
    Invoice, InvoiceDraft, InvoiceItem, InvoiceNumber, InvoiceStatus, InvoiceWithItems,
};

/// Storage operations for invoices
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Persist an invoice atomically
    ///
    /// # Arguments
    /// * `draft` - Validated invoice with computed totals
    /// * `deductions` - Consolidated stock deductions, ordered by inventory id
    ///
    /// # Returns
    /// * `Result<InvoiceWithItems>` - Stored invoice with its number and items
    async fn create(
        &self,
        draft: &InvoiceDraft,
        deductions: &[StockDeduction],
    ) -> Result<InvoiceWithItems>;

    async fn find_by_id(&self, id: i64) -> Result<Option<InvoiceWithItems>>;

    /// All invoices, newest first
    async fn list(&self) -> Result<Vec<Invoice>>;

    async fn update_status(&self, id: i64, status: InvoiceStatus) -> Result<Invoice>;

    /// Reserve the next number. The value is consumed even if no invoice is
    /// ever stored under it.
    async fn next_invoice_number(&self) -> Result<InvoiceNumber>;
}

/// MySQL-backed invoice storage
#[derive(Clone)]
pub struct MySqlInvoiceRepository {
    pool: MySqlPool,
    prefix: String,
}

impl MySqlInvoiceRepository {
    pub fn new(pool: MySqlPool, prefix: impl Into<String>) -> Self {
        Self {
            pool,
            prefix: prefix.into(),
        }
    }

    async fn fetch_items(&self, invoice_id: i64) -> Result<Vec<InvoiceItem>> {
        let rows = sqlx::query_as::<_, InvoiceItemRow>(
            r#"
            SELECT id, invoice_id, service_name, quantity, unit_price, total
            FROM invoice_items
            WHERE invoice_id = ?
            ORDER BY position
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(InvoiceItem::from).collect())
    }
}

#[async_trait]
impl InvoiceRepository for MySqlInvoiceRepository {
    async fn create(
        &self,
        draft: &InvoiceDraft,
        deductions: &[StockDeduction],
    ) -> Result<InvoiceWithItems> {
        let mut tx = self.pool.begin().await?;

        for deduction in deductions {
            reduce_stock_in_tx(&mut tx, *deduction).await?;
        }

        let number = allocate_number_in_tx(&mut tx, &self.prefix).await?;
        let created_at = Utc::now().trunc_subsecs(6);

        let result = sqlx::query(
            r#"
            INSERT INTO invoices (
                number, customer_name, customer_phone, customer_tax_id,
                subtotal, tax, total, status, date, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(number.to_string())
        .bind(&draft.customer_name)
        .bind(&draft.customer_phone)
        .bind(&draft.customer_tax_id)
        .bind(draft.totals.subtotal)
        .bind(draft.totals.tax)
        .bind(draft.totals.total)
        .bind(InvoiceStatus::Pending.to_string())
        .bind(draft.date)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        let invoice_id = to_id(result.last_insert_id())?;

        let mut items = Vec::with_capacity(draft.items.len());
        for (position, item) in draft.items.iter().enumerate() {
            let result = sqlx::query(
                r#"
                INSERT INTO invoice_items (
                    invoice_id, position, service_name, quantity, unit_price, total
                ) VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(invoice_id)
            .bind(position as i32)
            .bind(&item.service_name)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.total)
            .execute(&mut *tx)
            .await?;

            items.push(item.clone().into_item(to_id(result.last_insert_id())?, invoice_id));
        }

        tx.commit().await?;

        Ok(InvoiceWithItems {
            invoice: draft.into_invoice(invoice_id, number.to_string(), created_at),
            items,
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<InvoiceWithItems>> {
        let row = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, number, customer_name, customer_phone, customer_tax_id,
                   subtotal, tax, total, status, date, created_at
            FROM invoices
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let invoice = row.into_invoice()?;
        let items = self.fetch_items(invoice.id).await?;

        Ok(Some(InvoiceWithItems { invoice, items }))
    }

    async fn list(&self) -> Result<Vec<Invoice>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, number, customer_name, customer_phone, customer_tax_id,
                   subtotal, tax, total, status, date, created_at
            FROM invoices
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(InvoiceRow::into_invoice).collect()
    }

    async fn update_status(&self, id: i64, status: InvoiceStatus) -> Result<Invoice> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, number, customer_name, customer_phone, customer_tax_id,
                   subtotal, tax, total, status, date, created_at
            FROM invoices
            WHERE id = ?
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Invoice {} not found", id)))?;

        let mut invoice = row.into_invoice()?;
        if !invoice.status.can_transition_to(status) {
            return Err(AppError::validation(format!(
                "Cannot change invoice {} from {} to {}",
                invoice.number, invoice.status, status
            )));
        }

        sqlx::query("UPDATE invoices SET status = ? WHERE id = ?")
            .bind(status.to_string())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        invoice.status = status;
        Ok(invoice)
    }

    async fn next_invoice_number(&self) -> Result<InvoiceNumber> {
        let mut tx = self.pool.begin().await?;
        let number = allocate_number_in_tx(&mut tx, &self.prefix).await?;
        tx.commit().await?;
        Ok(number)
    }
}

/// Advance the prefix's counter row. The upsert takes the row's exclusive lock
/// straight away, so concurrent allocators queue behind it until commit and
/// no two transactions can read the same value.
async fn allocate_number_in_tx(conn: &mut MySqlConnection, prefix: &str) -> Result<InvoiceNumber> {
    sqlx::query(
        r#"
        INSERT INTO invoice_sequences (prefix, last_value) VALUES (?, 1)
        ON DUPLICATE KEY UPDATE last_value = last_value + 1
        "#,
    )
    .bind(prefix)
    .execute(&mut *conn)
    .await?;

    let sequence: i64 =
        sqlx::query_scalar("SELECT last_value FROM invoice_sequences WHERE prefix = ?")
            .bind(prefix)
            .fetch_one(&mut *conn)
            .await?;

    let sequence = u32::try_from(sequence)
        .map_err(|_| AppError::internal(format!("Invoice sequence out of range: {}", sequence)))?;

    InvoiceNumber::new(prefix, sequence)
}

fn to_id(last_insert_id: u64) -> Result<i64> {
    i64::try_from(last_insert_id).map_err(|_| AppError::internal("Row id out of range"))
}

// Helper structs for database mapping

#[derive(Debug, sqlx::FromRow)]
struct InvoiceRow {
    id: i64,
    number: String,
    customer_name: String,
    customer_phone: Option<String>,
    customer_tax_id: Option<String>,
    subtotal: Decimal,
    tax: Decimal,
    total: Decimal,
    status: String,
    date: NaiveDate,
    created_at: DateTime<Utc>,
}

impl InvoiceRow {
    fn into_invoice(self) -> Result<Invoice> {
        Ok(Invoice {
            id: self.id,
            number: self.number,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            customer_tax_id: self.customer_tax_id,
            subtotal: self.subtotal,
            tax: self.tax,
            total: self.total,
            status: self.status.parse()?,
            date: self.date,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct InvoiceItemRow {
    id: i64,
    invoice_id: i64,
    service_name: String,
    quantity: i32,
    unit_price: Decimal,
    total: Decimal,
}

impl From<InvoiceItemRow> for InvoiceItem {
    fn from(row: InvoiceItemRow) -> Self {
        InvoiceItem {
            id: row.id,
            invoice_id: row.invoice_id,
            service_name: row.service_name,
            quantity: row.quantity,
            unit_price: row.unit_price,
            total: row.total,
        }
    }
}
