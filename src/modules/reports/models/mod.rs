mod report;

pub use report::{CompletedVisit, ReportData, ReportQuery, ReportRange, NO_TOP_SERVICE};
