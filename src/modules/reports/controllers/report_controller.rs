use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::AppError;
use crate::modules::reports::models::ReportQuery;
use crate::modules::reports::services::ReportService;

/// GET /reports?startDate=YYYY-MM-DD&endDate=YYYY-MM-DD
pub async fn get_report(
    reports: web::Data<Arc<ReportService>>,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse, AppError> {
    let report = reports.report(&query).await?;
    Ok(HttpResponse::Ok().json(report))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/reports", web::get().to(get_report));
}
