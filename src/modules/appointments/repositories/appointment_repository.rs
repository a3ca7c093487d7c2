use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use rust_decimal::Decimal;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::appointments::models::{
    Appointment, NewAppointment, UpdateAppointmentRequest,
};

/// Storage operations for appointments
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Appointments ordered by date and time, optionally for a single day
    async fn list(&self, date: Option<NaiveDate>) -> Result<Vec<Appointment>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Appointment>>;

    async fn create(&self, appointment: NewAppointment) -> Result<Appointment>;

    async fn update(&self, id: i64, changes: &UpdateAppointmentRequest) -> Result<Appointment>;

    async fn delete(&self, id: i64) -> Result<()>;
}

/// MySQL-backed appointment storage
#[derive(Clone)]
pub struct MySqlAppointmentRepository {
    pool: MySqlPool,
}

impl MySqlAppointmentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for MySqlAppointmentRepository {
    async fn list(&self, date: Option<NaiveDate>) -> Result<Vec<Appointment>> {
        let rows = match date {
            Some(date) => {
                sqlx::query_as::<_, AppointmentRow>(
                    r#"
                    SELECT id, customer_name, customer_phone, service_name, service_price,
                           date, time, status, created_at
                    FROM appointments
                    WHERE date = ?
                    ORDER BY date, time, id
                    "#,
                )
                .bind(date)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, AppointmentRow>(
                    r#"
                    SELECT id, customer_name, customer_phone, service_name, service_price,
                           date, time, status, created_at
                    FROM appointments
                    ORDER BY date, time, id
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(AppointmentRow::into_appointment).collect()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Appointment>> {
        let row = sqlx::query_as::<_, AppointmentRow>(
            r#"
            SELECT id, customer_name, customer_phone, service_name, service_price,
                   date, time, status, created_at
            FROM appointments
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AppointmentRow::into_appointment).transpose()
    }

    async fn create(&self, appointment: NewAppointment) -> Result<Appointment> {
        let created_at = Utc::now().trunc_subsecs(6);

        let result = sqlx::query(
            r#"
            INSERT INTO appointments (
                customer_name, customer_phone, service_name, service_price,
                date, time, status, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&appointment.customer_name)
        .bind(&appointment.customer_phone)
        .bind(&appointment.service_name)
        .bind(appointment.service_price)
        .bind(appointment.date)
        .bind(&appointment.time)
        .bind(appointment.status.to_string())
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|_| AppError::internal("Appointment id out of range"))?;

        Ok(appointment.into_appointment(id, created_at))
    }

    async fn update(&self, id: i64, changes: &UpdateAppointmentRequest) -> Result<Appointment> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, AppointmentRow>(
            r#"
            SELECT id, customer_name, customer_phone, service_name, service_price,
                   date, time, status, created_at
            FROM appointments
            WHERE id = ?
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Appointment {} not found", id)))?;

        let mut appointment = row.into_appointment()?;
        changes.apply_to(&mut appointment)?;

        sqlx::query(
            r#"
            UPDATE appointments
            SET customer_name = ?, customer_phone = ?, service_name = ?, service_price = ?,
                date = ?, time = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(&appointment.customer_name)
        .bind(&appointment.customer_phone)
        .bind(&appointment.service_name)
        .bind(appointment.service_price)
        .bind(appointment.date)
        .bind(&appointment.time)
        .bind(appointment.status.to_string())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(appointment)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Appointment {} not found", id)));
        }

        Ok(())
    }
}

// Helper struct for database mapping

#[derive(Debug, sqlx::FromRow)]
struct AppointmentRow {
    id: i64,
    customer_name: String,
    customer_phone: Option<String>,
    service_name: String,
    service_price: Decimal,
    date: NaiveDate,
    time: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl AppointmentRow {
    fn into_appointment(self) -> Result<Appointment> {
        Ok(Appointment {
            id: self.id,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            service_name: self.service_name,
            service_price: self.service_price,
            date: self.date,
            time: self.time,
            status: self.status.parse()?,
            created_at: self.created_at,
        })
    }
}
