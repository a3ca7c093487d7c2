// Appointments are wash bookings. Like invoice items they carry a snapshot of
// the service name and price, so the schedule still reads correctly after the
// catalog changes.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{money, AppError, Result};
use crate::modules::invoices::models::parse_business_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            _ => Err(AppError::validation(format!(
                "Invalid appointment status: {}",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub service_name: String,
    pub service_price: Decimal,
    pub date: NaiveDate,

    /// `HH:MM`, 24-hour clock
    pub time: String,

    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

/// POST /appointments body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    pub service_name: String,
    pub service_price: Decimal,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
}

/// A validated booking ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub service_name: String,
    pub service_price: Decimal,
    pub date: NaiveDate,
    pub time: String,
    pub status: AppointmentStatus,
}

impl NewAppointment {
    pub fn from_request(request: CreateAppointmentRequest) -> Result<Self> {
        let customer_name = required("Customer name", &request.customer_name)?;
        let service_name = required("Service name", &request.service_name)?;
        money::validate_amount("Service price", request.service_price)?;

        Ok(Self {
            customer_name,
            customer_phone: request
                .customer_phone
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            service_name,
            service_price: money::round(request.service_price),
            date: parse_business_date(&request.date)?,
            time: parse_appointment_time(&request.time)?,
            status: request.status.unwrap_or_default(),
        })
    }

    pub fn into_appointment(self, id: i64, created_at: DateTime<Utc>) -> Appointment {
        Appointment {
            id,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            service_name: self.service_name,
            service_price: self.service_price,
            date: self.date,
            time: self.time,
            status: self.status,
            created_at,
        }
    }
}

/// PUT /appointments/{id} body; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub service_price: Option<Decimal>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
}

impl UpdateAppointmentRequest {
    /// Validate the present fields and merge them into `appointment`
    pub fn apply_to(&self, appointment: &mut Appointment) -> Result<()> {
        if let Some(name) = &self.customer_name {
            appointment.customer_name = required("Customer name", name)?;
        }
        if let Some(phone) = &self.customer_phone {
            let phone = phone.trim();
            appointment.customer_phone = (!phone.is_empty()).then(|| phone.to_string());
        }
        if let Some(name) = &self.service_name {
            appointment.service_name = required("Service name", name)?;
        }
        if let Some(price) = self.service_price {
            money::validate_amount("Service price", price)?;
            appointment.service_price = money::round(price);
        }
        if let Some(date) = &self.date {
            appointment.date = parse_business_date(date)?;
        }
        if let Some(time) = &self.time {
            appointment.time = parse_appointment_time(time)?;
        }
        if let Some(status) = self.status {
            appointment.status = status;
        }
        Ok(())
    }
}

/// GET /appointments query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentQuery {
    #[serde(default)]
    pub date: Option<String>,
}

impl AppointmentQuery {
    pub fn date(&self) -> Result<Option<NaiveDate>> {
        match self.date.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(date) => parse_business_date(date).map(Some),
        }
    }
}

/// Normalize an `HH:MM` time, rejecting anything that is not a valid clock time
pub fn parse_appointment_time(value: &str) -> Result<String> {
    let trimmed = value.trim();
    let time = NaiveTime::parse_from_str(trimmed, "%H:%M")
        .ok()
        .filter(|_| trimmed.len() == 5)
        .ok_or_else(|| {
            AppError::validation(format!("Time must use the HH:MM format, got: {}", value))
        })?;

    Ok(time.format("%H:%M").to_string())
}

fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{} cannot be empty", field)));
    }
    if value.chars().count() > 255 {
        return Err(AppError::validation(format!(
            "{} cannot exceed 255 characters",
            field
        )));
    }
    Ok(value.to_string())
}
