//! Report rendering: JSON document or plain text table.

use std::io::Write;

use rust_decimal::Decimal;
use serde::Serialize;
use varwatch_core::variance::{VarianceResult, VarianceSummary, VarianceThresholds};
use varwatch_shared::config::{ReportConfig, ReportFormat};
use varwatch_shared::{AppError, AppResult};

/// Everything a report is built from.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    /// Thresholds the results were classified with.
    pub thresholds: &'a VarianceThresholds,
    /// Rendered rows.
    pub results: Vec<&'a VarianceResult>,
    /// Summary over all results, regardless of row filtering.
    pub summary: &'a VarianceSummary,
}

impl<'a> Report<'a> {
    /// Builds a report, keeping only flagged rows when `flagged_only` is set.
    #[must_use]
    pub fn new(
        thresholds: &'a VarianceThresholds,
        results: &'a [VarianceResult],
        summary: &'a VarianceSummary,
        flagged_only: bool,
    ) -> Self {
        let results = results
            .iter()
            .filter(|r| !flagged_only || r.needs_attention)
            .collect();

        Self {
            thresholds,
            results,
            summary,
        }
    }
}

/// Writes the report in the configured format.
///
/// # Errors
///
/// Returns `AppError::Output` if serialization or writing fails.
pub fn render<W: Write>(out: &mut W, config: &ReportConfig, report: &Report<'_>) -> AppResult<()> {
    match config.format {
        ReportFormat::Json => render_json(out, report),
        ReportFormat::Table => render_table(out, report).map_err(output_error),
    }
}

fn render_json<W: Write>(out: &mut W, report: &Report<'_>) -> AppResult<()> {
    serde_json::to_writer_pretty(&mut *out, report)
        .map_err(|e| AppError::Output(e.to_string()))?;
    writeln!(out).map_err(output_error)
}

fn render_table<W: Write>(out: &mut W, report: &Report<'_>) -> std::io::Result<()> {
    writeln!(
        out,
        "{:<8} {:<15} {:>12} {:>12} {:>9} {:>8}  {:<28}",
        "PERIOD", "COST CENTER", "BUDGET", "ACTUAL", "VARIANCE%", "RATE%", "CATEGORY"
    )?;

    for row in &report.results {
        writeln!(
            out,
            "{:<8} {:<15} {:>12} {:>12} {:>9} {:>8}  {:<28}{}",
            row.period.to_string(),
            row.cost_center.code(),
            amount(row.budgeted_amount),
            amount(row.actual_amount),
            amount(row.variance_pct),
            amount(row.spending_rate_pct),
            row.category.label(),
            if row.needs_attention { " !" } else { "" },
        )?;
    }

    let summary = report.summary;
    writeln!(out)?;
    writeln!(
        out,
        "Records: {}  Needs attention: {}",
        summary.records, summary.flagged
    )?;
    writeln!(
        out,
        "Budget: {}  Actual: {}  Variance: {} ({}%)",
        amount(summary.total_budgeted),
        amount(summary.total_actual),
        amount(summary.total_variance),
        amount(summary.variance_pct),
    )?;

    writeln!(out)?;
    writeln!(out, "By category:")?;
    for entry in &summary.by_category {
        writeln!(out, "  {:<28} {:>5}", entry.category.label(), entry.count)?;
    }

    writeln!(out)?;
    writeln!(out, "By cost center:")?;
    for center in &summary.cost_centers {
        writeln!(
            out,
            "  {:<15} {:<26} {:>13} {:>13} {:>8}% {:>3} flagged  worst: {}",
            center.cost_center.code(),
            center.name,
            amount(center.total_budgeted),
            amount(center.total_actual),
            amount(center.variance_pct),
            center.flagged,
            center.worst_category.label(),
        )?;
    }

    writeln!(out)?;
    writeln!(out, "By fiscal quarter:")?;
    for quarter in &summary.fiscal_quarters {
        writeln!(
            out,
            "  FY{} {}  {:>13} {:>13} {:>8}% {:>3} flagged",
            quarter.fiscal_year,
            quarter.quarter,
            amount(quarter.total_budgeted),
            amount(quarter.total_actual),
            amount(quarter.variance_pct),
            quarter.flagged,
        )?;
    }

    Ok(())
}

/// Two-decimal text for table cells.
fn amount(value: Decimal) -> String {
    format!("{value:.2}")
}

fn output_error(err: std::io::Error) -> AppError {
    AppError::Output(err.to_string())
}
