// Period reports (`/reports`)

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{ReportData, ReportRange};
pub use repositories::{MySqlReportRepository, ReportRepository};
pub use services::ReportService;
