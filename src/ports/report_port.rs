//! Report output port.

use crate::domain::error::OppscanError;
use crate::domain::screen::ScreenReport;
use chrono::NaiveDate;

/// Port for writing screening reports.
pub trait ReportPort {
    fn write(
        &self,
        report: &ScreenReport,
        run_date: NaiveDate,
        output_path: &str,
    ) -> Result<(), OppscanError>;
}
