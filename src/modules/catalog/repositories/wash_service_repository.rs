use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::catalog::models::{NewWashService, UpdateWashServiceRequest, WashService};

/// Storage operations for the service catalog
#[async_trait]
pub trait WashServiceRepository: Send + Sync {
    /// Active entries ordered by price, then name
    async fn list_active(&self) -> Result<Vec<WashService>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<WashService>>;

    async fn create(&self, service: NewWashService) -> Result<WashService>;

    async fn update(&self, id: i64, changes: &UpdateWashServiceRequest) -> Result<WashService>;

    /// Hard delete; past invoices keep their own copy of name and price
    async fn delete(&self, id: i64) -> Result<()>;
}

#[derive(Clone)]
pub struct MySqlWashServiceRepository {
    pool: MySqlPool,
}

impl MySqlWashServiceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WashServiceRepository for MySqlWashServiceRepository {
    async fn list_active(&self) -> Result<Vec<WashService>> {
        let rows = sqlx::query_as::<_, WashServiceRow>(
            r#"
            SELECT id, name, description, price, duration, active
            FROM services
            WHERE active = TRUE
            ORDER BY price, name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(WashService::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<WashService>> {
        let row = sqlx::query_as::<_, WashServiceRow>(
            "SELECT id, name, description, price, duration, active FROM services WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(WashService::from))
    }

    async fn create(&self, service: NewWashService) -> Result<WashService> {
        let result = sqlx::query(
            r#"
            INSERT INTO services (name, description, price, duration, active)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.price)
        .bind(service.duration)
        .bind(service.active)
        .execute(&self.pool)
        .await?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|_| AppError::internal("Service id out of range"))?;

        Ok(service.into_service(id))
    }

    async fn update(&self, id: i64, changes: &UpdateWashServiceRequest) -> Result<WashService> {
        let mut tx = self.pool.begin().await?;

        let mut service: WashService = sqlx::query_as::<_, WashServiceRow>(
            r#"
            SELECT id, name, description, price, duration, active
            FROM services
            WHERE id = ?
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .map(WashService::from)
        .ok_or_else(|| AppError::not_found(format!("Service {} not found", id)))?;

        changes.apply_to(&mut service)?;

        sqlx::query(
            r#"
            UPDATE services
            SET name = ?, description = ?, price = ?, duration = ?, active = ?
            WHERE id = ?
            "#,
        )
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.price)
        .bind(service.duration)
        .bind(service.active)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(service)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM services WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Service {} not found", id)));
        }

        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct WashServiceRow {
    id: i64,
    name: String,
    description: Option<String>,
    price: Decimal,
    duration: i32,
    active: bool,
}

impl From<WashServiceRow> for WashService {
    fn from(row: WashServiceRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            duration: row.duration,
            active: row.active,
        }
    }
}
