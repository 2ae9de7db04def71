//! HTML report adapter implementing ReportPort.
//!
//! Renders the screen report through Askama templates. Every cell is
//! pre-formatted into a view struct; the templates only lay them out and
//! HTML-escape them.

use std::fs;
use std::path::Path;

use askama::Template;
use chrono::NaiveDate;

use crate::domain::classify::Action;
use crate::domain::error::OppscanError;
use crate::domain::screen::{ScreenReport, ScreenRow};
use crate::ports::report_port::ReportPort;

/// Diagnostics list at most this many unresolved symbols.
pub const UNRESOLVED_PREVIEW_LIMIT: usize = 200;

pub fn report_subject(run_date: NaiveDate) -> String {
    format!("Investment Opportunities (Universe) – {}", run_date.format("%Y-%m-%d"))
}

pub fn no_data_subject(run_date: NaiveDate) -> String {
    format!("Opportunity Allocator – {} (No Data)", run_date.format("%Y-%m-%d"))
}

/// Subject line matching whichever page [`render_html`] produces.
pub fn subject_for(report: &ScreenReport, run_date: NaiveDate) -> String {
    if report.is_empty() {
        no_data_subject(run_date)
    } else {
        report_subject(run_date)
    }
}

struct BucketRowView {
    symbol: String,
    ticker: String,
    down_streak: u32,
    drawdown: String,
    trend: String,
    panic: u32,
    growth: u32,
    action: String,
    allocation: &'static str,
}

impl From<&ScreenRow> for BucketRowView {
    fn from(row: &ScreenRow) -> Self {
        Self {
            symbol: row.symbol.clone(),
            ticker: row.ticker.clone(),
            down_streak: row.indicators.down_streak,
            drawdown: format!("{:.2}", row.indicators.drawdown_pct),
            trend: row.indicators.trend.to_string(),
            panic: row.score.panic_score,
            growth: row.score.growth_score,
            action: row.score.action.to_string(),
            allocation: row.score.allocation_range(),
        }
    }
}

struct BucketSection {
    title: String,
    rows: Vec<BucketRowView>,
}

struct AlertRowView {
    symbol: String,
    ticker: String,
    messages: String,
    trend: String,
    drawdown: String,
    runup: String,
    down_streak: u32,
    up_streak: u32,
    severity: u32,
}

impl From<&ScreenRow> for AlertRowView {
    fn from(row: &ScreenRow) -> Self {
        Self {
            symbol: row.symbol.clone(),
            ticker: row.ticker.clone(),
            messages: row.alerts.to_string(),
            trend: row.indicators.trend.to_string(),
            drawdown: format!("{:.2}", row.indicators.drawdown_pct),
            runup: format!("{:.2}", row.indicators.runup_pct),
            down_streak: row.indicators.down_streak,
            up_streak: row.indicators.up_streak,
            severity: row.severity,
        }
    }
}

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate {
    subject: String,
    sections: Vec<BucketSection>,
    alerts: Vec<AlertRowView>,
    processed: usize,
    universe_size: usize,
    unresolved_count: usize,
    unresolved_preview: String,
}

#[derive(Template)]
#[template(path = "no_data.html")]
struct NoDataTemplate {
    subject: String,
    unresolved_count: usize,
    unresolved_preview: String,
}

fn bucket_title(action: Action) -> String {
    format!("{} ({}) – Top picks", action, action.description())
}

fn unresolved_preview(report: &ScreenReport) -> String {
    report
        .unresolved
        .iter()
        .take(UNRESOLVED_PREVIEW_LIMIT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_error(e: askama::Error) -> OppscanError {
    OppscanError::Report {
        reason: e.to_string(),
    }
}

/// Renders the full page, or the No Data page when nothing was screened.
pub fn render_html(
    report: &ScreenReport,
    run_date: NaiveDate,
    top_n: usize,
) -> Result<String, OppscanError> {
    let subject = subject_for(report, run_date);

    if report.is_empty() {
        let page = NoDataTemplate {
            subject,
            unresolved_count: report.unresolved.len(),
            unresolved_preview: unresolved_preview(report),
        };
        return page.render().map_err(render_error);
    }

    let sections = Action::ALL
        .iter()
        .map(|&action| BucketSection {
            title: bucket_title(action),
            rows: report
                .bucket(action, top_n)
                .into_iter()
                .map(BucketRowView::from)
                .collect(),
        })
        .collect();

    let page = ReportTemplate {
        subject,
        sections,
        alerts: report
            .alert_rows()
            .into_iter()
            .map(AlertRowView::from)
            .collect(),
        processed: report.processed(),
        universe_size: report.universe_size,
        unresolved_count: report.unresolved.len(),
        unresolved_preview: unresolved_preview(report),
    };
    page.render().map_err(render_error)
}

pub struct HtmlReportAdapter {
    top_n: usize,
}

impl HtmlReportAdapter {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }
}

impl ReportPort for HtmlReportAdapter {
    fn write(
        &self,
        report: &ScreenReport,
        run_date: NaiveDate,
        output_path: &str,
    ) -> Result<(), OppscanError> {
        let html = render_html(report, run_date, self.top_n)?;

        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, html)?;

        Ok(())
    }
}
