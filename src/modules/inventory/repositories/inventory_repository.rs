// InventoryRepository: storage interface for products and services, plus the
// MySQL implementation.
//
// Stock reduction is exposed twice: as a standalone operation, and as
// `reduce_stock_in_tx` so invoice creation can run it inside its own
// transaction and have it rolled back if a later step fails.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{MySqlConnection, MySqlPool};

use crate::core::{AppError, Result};
use crate::modules::inventory::models::{
    next_service_code, InventoryItem, NewInventoryItem, StockDeduction,
    UpdateInventoryItemRequest,
};

/// Storage operations for inventory rows
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Active rows ordered by name
    async fn list_active(&self) -> Result<Vec<InventoryItem>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<InventoryItem>>;

    async fn find_by_barcode(&self, barcode: &str) -> Result<Option<InventoryItem>>;

    /// Insert a row; services without a barcode receive the next service code
    async fn create(&self, item: NewInventoryItem) -> Result<InventoryItem>;

    async fn update(&self, id: i64, changes: &UpdateInventoryItemRequest) -> Result<InventoryItem>;

    /// Soft delete
    async fn deactivate(&self, id: i64) -> Result<()>;

    /// Take units from a product. No-op for services; fails with
    /// `InsufficientStock` when fewer units are on hand.
    async fn reduce_stock(&self, deduction: StockDeduction) -> Result<InventoryItem>;
}

/// MySQL-backed inventory storage
#[derive(Clone)]
pub struct MySqlInventoryRepository {
    pool: MySqlPool,
}

impl MySqlInventoryRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryRepository for MySqlInventoryRepository {
    async fn list_active(&self) -> Result<Vec<InventoryItem>> {
        let rows = sqlx::query_as::<_, InventoryRow>(
            r#"
            SELECT id, name, description, barcode, quantity, min_quantity,
                   price, supplier, category, is_service, active
            FROM inventory
            WHERE active = TRUE
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(InventoryItem::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<InventoryItem>> {
        let row = sqlx::query_as::<_, InventoryRow>(
            r#"
            SELECT id, name, description, barcode, quantity, min_quantity,
                   price, supplier, category, is_service, active
            FROM inventory
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(InventoryItem::from))
    }

    async fn find_by_barcode(&self, barcode: &str) -> Result<Option<InventoryItem>> {
        let row = sqlx::query_as::<_, InventoryRow>(
            r#"
            SELECT id, name, description, barcode, quantity, min_quantity,
                   price, supplier, category, is_service, active
            FROM inventory
            WHERE barcode = ? AND active = TRUE
            "#,
        )
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(InventoryItem::from))
    }

    async fn create(&self, mut item: NewInventoryItem) -> Result<InventoryItem> {
        let mut tx = self.pool.begin().await?;

        if item.needs_service_code() {
            let codes: Vec<String> = sqlx::query_scalar(
                r#"
                SELECT barcode
                FROM inventory
                WHERE is_service = TRUE AND barcode IS NOT NULL
                FOR UPDATE
                "#,
            )
            .fetch_all(&mut *tx)
            .await?;

            item.barcode = Some(next_service_code(codes.iter().map(String::as_str)));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO inventory (
                name, description, barcode, quantity, min_quantity,
                price, supplier, category, is_service, active
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.barcode)
        .bind(item.quantity)
        .bind(item.min_quantity)
        .bind(item.price)
        .bind(&item.supplier)
        .bind(&item.category)
        .bind(item.is_service)
        .bind(item.active)
        .execute(&mut *tx)
        .await
        .map_err(|e| barcode_conflict(e, item.barcode.as_deref()))?;

        tx.commit().await?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|_| AppError::internal("Inventory id out of range"))?;

        Ok(item.into_item(id))
    }

    async fn update(&self, id: i64, changes: &UpdateInventoryItemRequest) -> Result<InventoryItem> {
        let mut tx = self.pool.begin().await?;

        let mut item = lock_item(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Inventory item {} not found", id)))?;

        changes.apply_to(&mut item);

        sqlx::query(
            r#"
            UPDATE inventory
            SET name = ?, description = ?, barcode = ?, quantity = ?, min_quantity = ?,
                price = ?, supplier = ?, category = ?, is_service = ?, active = ?
            WHERE id = ?
            "#,
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.barcode)
        .bind(item.quantity)
        .bind(item.min_quantity)
        .bind(item.price)
        .bind(&item.supplier)
        .bind(&item.category)
        .bind(item.is_service)
        .bind(item.active)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| barcode_conflict(e, item.barcode.as_deref()))?;

        tx.commit().await?;

        Ok(item)
    }

    async fn deactivate(&self, id: i64) -> Result<()> {
        let result = sqlx::query("UPDATE inventory SET active = FALSE WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Inventory item {} not found", id)));
        }

        Ok(())
    }

    async fn reduce_stock(&self, deduction: StockDeduction) -> Result<InventoryItem> {
        let mut tx = self.pool.begin().await?;
        let item = reduce_stock_in_tx(&mut tx, deduction).await?;
        tx.commit().await?;
        Ok(item)
    }
}

/// Check-then-decrement for one row inside the caller's transaction.
///
/// The row is locked with `FOR UPDATE` before the check, and the update is
/// conditioned on the quantity still covering the request, so concurrent
/// invoices can never both consume the same units.
pub(crate) async fn reduce_stock_in_tx(
    conn: &mut MySqlConnection,
    deduction: StockDeduction,
) -> Result<InventoryItem> {
    let mut item = lock_item(conn, deduction.inventory_id)
        .await?
        .filter(|item| item.active)
        .ok_or_else(|| {
            AppError::not_found(format!(
                "Inventory item {} not found",
                deduction.inventory_id
            ))
        })?;

    let Some(remaining) = item.remaining_after(deduction.quantity)? else {
        return Ok(item);
    };

    let result = sqlx::query(
        r#"
        UPDATE inventory
        SET quantity = quantity - ?
        WHERE id = ? AND quantity >= ?
        "#,
    )
    .bind(deduction.quantity)
    .bind(deduction.inventory_id)
    .bind(deduction.quantity)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::insufficient_stock(
            &item.name,
            deduction.quantity,
            item.on_hand(),
        ));
    }

    item.quantity = Some(remaining);
    Ok(item)
}

async fn lock_item(conn: &mut MySqlConnection, id: i64) -> Result<Option<InventoryItem>> {
    let row = sqlx::query_as::<_, InventoryRow>(
        r#"
        SELECT id, name, description, barcode, quantity, min_quantity,
               price, supplier, category, is_service, active
        FROM inventory
        WHERE id = ?
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(InventoryItem::from))
}

fn barcode_conflict(e: sqlx::Error, barcode: Option<&str>) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::validation(format!(
                "Barcode '{}' is already in use",
                barcode.unwrap_or_default()
            ));
        }
    }
    AppError::Database(e)
}

// Helper struct for database mapping

#[derive(Debug, sqlx::FromRow)]
struct InventoryRow {
    id: i64,
    name: String,
    description: Option<String>,
    barcode: Option<String>,
    quantity: Option<i32>,
    min_quantity: Option<i32>,
    price: Decimal,
    supplier: Option<String>,
    category: Option<String>,
    is_service: bool,
    active: bool,
}

impl From<InventoryRow> for InventoryItem {
    fn from(row: InventoryRow) -> Self {
        InventoryItem {
            id: row.id,
            name: row.name,
            description: row.description,
            barcode: row.barcode,
            quantity: row.quantity,
            min_quantity: row.min_quantity,
            price: row.price,
            supplier: row.supplier,
            category: row.category,
            is_service: row.is_service,
            active: row.active,
        }
    }
}
