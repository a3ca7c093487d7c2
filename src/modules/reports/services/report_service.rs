use std::sync::Arc;

use crate::core::Result;
use crate::modules::reports::models::{ReportData, ReportQuery};
use crate::modules::reports::repositories::ReportRepository;

pub struct ReportService {
    report_repo: Arc<dyn ReportRepository>,
}

impl ReportService {
    pub fn new(report_repo: Arc<dyn ReportRepository>) -> Self {
        Self { report_repo }
    }

    /// Revenue and service figures for the query's date range
    pub async fn report(&self, query: &ReportQuery) -> Result<ReportData> {
        let range = query.range()?;

        let revenue = self.report_repo.revenue_between(&range).await?;
        let visits = self.report_repo.completed_visits_between(&range).await?;
        let report = ReportData::summarize(&range, revenue, &visits);

        tracing::debug!(
            period = %report.period,
            revenue = %report.total_revenue,
            services = report.total_services,
            "Report generated"
        );

        Ok(report)
    }
}
