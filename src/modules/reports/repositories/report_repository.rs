use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::MySqlPool;

use crate::core::{money, Result};
use crate::modules::reports::models::{CompletedVisit, ReportRange};

/// Read-only queries behind the period report
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Sum of invoice totals dated within `range`, cancelled invoices excluded
    async fn revenue_between(&self, range: &ReportRange) -> Result<Decimal>;

    /// Appointments dated within `range` whose status is completed
    async fn completed_visits_between(&self, range: &ReportRange) -> Result<Vec<CompletedVisit>>;
}

#[derive(Clone)]
pub struct MySqlReportRepository {
    pool: MySqlPool,
}

impl MySqlReportRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for MySqlReportRepository {
    async fn revenue_between(&self, range: &ReportRange) -> Result<Decimal> {
        let revenue: Decimal = sqlx::query_scalar(
            r#"
            SELECT CAST(COALESCE(SUM(total), 0) AS DECIMAL(20, 2))
            FROM invoices
            WHERE date BETWEEN ? AND ? AND status <> 'cancelled'
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_one(&self.pool)
        .await?;

        Ok(money::round(revenue))
    }

    async fn completed_visits_between(&self, range: &ReportRange) -> Result<Vec<CompletedVisit>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT customer_name, service_name
            FROM appointments
            WHERE date BETWEEN ? AND ? AND status = 'completed'
            ORDER BY date, time, id
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(customer_name, service_name)| CompletedVisit {
                customer_name,
                service_name,
            })
            .collect())
    }
}
