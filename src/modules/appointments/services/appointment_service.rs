use std::sync::Arc;

use chrono::NaiveDate;

use crate::core::{AppError, Result};
use crate::modules::appointments::models::{
    Appointment, CreateAppointmentRequest, NewAppointment, UpdateAppointmentRequest,
};
use crate::modules::appointments::repositories::AppointmentRepository;

/// Service for the booking schedule
pub struct AppointmentService {
    appointment_repo: Arc<dyn AppointmentRepository>,
}

impl AppointmentService {
    pub fn new(appointment_repo: Arc<dyn AppointmentRepository>) -> Self {
        Self { appointment_repo }
    }

    pub async fn list_appointments(&self, date: Option<NaiveDate>) -> Result<Vec<Appointment>> {
        self.appointment_repo.list(date).await
    }

    pub async fn get_appointment(&self, id: i64) -> Result<Appointment> {
        self.appointment_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Appointment {} not found", id)))
    }

    pub async fn create_appointment(&self, request: CreateAppointmentRequest) -> Result<Appointment> {
        let appointment = NewAppointment::from_request(request)?;
        let created = self.appointment_repo.create(appointment).await?;

        tracing::info!(
            appointment_id = created.id,
            date = %created.date,
            time = %created.time,
            service = %created.service_name,
            "Appointment booked"
        );

        Ok(created)
    }

    pub async fn update_appointment(
        &self,
        id: i64,
        changes: UpdateAppointmentRequest,
    ) -> Result<Appointment> {
        let updated = self.appointment_repo.update(id, &changes).await?;

        tracing::info!(appointment_id = id, status = %updated.status, "Appointment updated");

        Ok(updated)
    }

    pub async fn delete_appointment(&self, id: i64) -> Result<()> {
        self.appointment_repo.delete(id).await?;

        tracing::info!(appointment_id = id, "Appointment deleted");

        Ok(())
    }
}
