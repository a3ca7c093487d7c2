// The menu of washes offered at the counter. Entries only suggest a name and
// price: invoices and appointments copy both at the time of sale, so editing
// or removing an entry never touches history.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{money, AppError, Result};

/// Longest service the schedule can hold: one full day
const MAX_DURATION_MINUTES: i32 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WashService {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,

    /// Minutes the bay is busy
    pub duration: i32,

    pub active: bool,
}

/// POST /services body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWashServiceRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub duration: i32,
    #[serde(default)]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWashService {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub duration: i32,
    pub active: bool,
}

impl NewWashService {
    pub fn from_request(request: CreateWashServiceRequest) -> Result<Self> {
        let name = request.name.trim().to_string();
        validate_name(&name)?;
        money::validate_amount("Price", request.price)?;
        validate_duration(request.duration)?;

        Ok(Self {
            name,
            description: non_blank(request.description.as_deref()),
            price: money::round(request.price),
            duration: request.duration,
            active: request.active.unwrap_or(true),
        })
    }

    pub fn into_service(self, id: i64) -> WashService {
        WashService {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            duration: self.duration,
            active: self.active,
        }
    }
}

/// PUT /services/{id} body; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWashServiceRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub duration: Option<i32>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl UpdateWashServiceRequest {
    /// Validate and merge in one step, so a bad field leaves `service` as it was
    pub fn apply_to(&self, service: &mut WashService) -> Result<()> {
        let mut updated = service.clone();

        if let Some(name) = &self.name {
            let name = name.trim();
            validate_name(name)?;
            updated.name = name.to_string();
        }
        if let Some(description) = &self.description {
            updated.description = non_blank(Some(description));
        }
        if let Some(price) = self.price {
            money::validate_amount("Price", price)?;
            updated.price = money::round(price);
        }
        if let Some(duration) = self.duration {
            validate_duration(duration)?;
            updated.duration = duration;
        }
        if let Some(active) = self.active {
            updated.active = active;
        }

        *service = updated;
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(AppError::validation("Service name cannot be empty"));
    }
    if name.chars().count() > 255 {
        return Err(AppError::validation(
            "Service name cannot exceed 255 characters",
        ));
    }
    Ok(())
}

fn validate_duration(minutes: i32) -> Result<()> {
    if !(1..=MAX_DURATION_MINUTES).contains(&minutes) {
        return Err(AppError::validation(format!(
            "Duration must be between 1 and {} minutes, got: {}",
            MAX_DURATION_MINUTES, minutes
        )));
    }
    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
