// A report covers an inclusive range of business dates. Revenue comes from
// the invoices issued in the range (cancelled ones excluded); the service
// figures come from the appointments completed in it.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};
use crate::modules::invoices::models::parse_business_date;

/// `topService` when nothing was completed in the range
pub const NO_TOP_SERVICE: &str = "N/A";

/// GET /reports query string
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl ReportQuery {
    pub fn range(&self) -> Result<ReportRange> {
        match (present(&self.start_date), present(&self.end_date)) {
            (Some(start), Some(end)) => {
                ReportRange::new(parse_business_date(start)?, parse_business_date(end)?)
            }
            _ => Err(AppError::validation(
                "Both startDate and endDate are required",
            )),
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Inclusive range of business dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(AppError::validation(format!(
                "startDate {} is after endDate {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Label printed on the report, e.g. `2025-01-01 a 2025-01-31`
    pub fn period(&self) -> String {
        format!("{} a {}", self.start, self.end)
    }
}

/// Who was served and with what, for one completed appointment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedVisit {
    pub customer_name: String,
    pub service_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub total_revenue: Decimal,

    /// Completed appointments
    pub total_services: u64,

    /// Distinct customer names among completed appointments
    pub total_customers: u64,

    /// Most completed service; ties go to the alphabetically first name
    pub top_service: String,

    pub period: String,
}

impl ReportData {
    pub fn summarize(range: &ReportRange, total_revenue: Decimal, visits: &[CompletedVisit]) -> Self {
        let customers: BTreeSet<&str> = visits.iter().map(|v| v.customer_name.as_str()).collect();

        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
        for visit in visits {
            *counts.entry(visit.service_name.as_str()).or_default() += 1;
        }

        // BTreeMap iterates names in order, so keeping the first strict
        // maximum breaks ties alphabetically
        let mut top: Option<(&str, u64)> = None;
        for (name, count) in counts {
            if top.map_or(true, |(_, best)| count > best) {
                top = Some((name, count));
            }
        }

        Self {
            total_revenue,
            total_services: visits.len() as u64,
            total_customers: customers.len() as u64,
            top_service: top
                .map(|(name, _)| name.to_string())
                .unwrap_or_else(|| NO_TOP_SERVICE.to_string()),
            period: range.period(),
        }
    }
}
