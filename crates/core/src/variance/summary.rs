//! Aggregation of classified variances for reporting.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use varwatch_shared::types::{CostCenter, FiscalQuarter};

use super::category::VarianceCategory;
use super::classifier::percent_of;
use super::error::VarianceError;
use super::types::VarianceResult;

/// Number of results in one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    /// Category.
    pub category: VarianceCategory,
    /// Number of results.
    pub count: usize,
}

/// Totals for one cost center across all periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostCenterSummary {
    /// Cost center.
    pub cost_center: CostCenter,
    /// Program name.
    pub name: &'static str,
    /// Number of periods reported.
    pub periods: usize,
    /// Total budgeted amount.
    pub total_budgeted: Decimal,
    /// Total actual amount.
    pub total_actual: Decimal,
    /// Total variance (actual - budgeted).
    pub total_variance: Decimal,
    /// Total variance as a percentage of total budget.
    pub variance_pct: Decimal,
    /// Periods that need attention.
    pub flagged: usize,
    /// Most severe category seen.
    pub worst_category: VarianceCategory,
}

/// Totals for one fiscal quarter across all cost centers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuarterSummary {
    /// Fiscal year the quarter belongs to.
    pub fiscal_year: i32,
    /// Quarter within the fiscal year.
    pub quarter: FiscalQuarter,
    /// Number of results in the quarter.
    pub records: usize,
    /// Total budgeted amount.
    pub total_budgeted: Decimal,
    /// Total actual amount.
    pub total_actual: Decimal,
    /// Total variance as a percentage of total budget.
    pub variance_pct: Decimal,
    /// Results that need attention.
    pub flagged: usize,
}

/// Portfolio-wide variance summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarianceSummary {
    /// Number of results summarized.
    pub records: usize,
    /// Results that need attention.
    pub flagged: usize,
    /// Count per category, every category present, most overspent first.
    pub by_category: Vec<CategoryCount>,
    /// Total budgeted amount.
    pub total_budgeted: Decimal,
    /// Total actual amount.
    pub total_actual: Decimal,
    /// Total variance (actual - budgeted).
    pub total_variance: Decimal,
    /// Total variance as a percentage of total budget, zero without budget.
    pub variance_pct: Decimal,
    /// Per cost center breakdown in catalogue order.
    pub cost_centers: Vec<CostCenterSummary>,
    /// Per fiscal quarter breakdown in chronological order.
    pub fiscal_quarters: Vec<QuarterSummary>,
}

impl VarianceSummary {
    /// Summarizes a set of results.
    ///
    /// # Errors
    ///
    /// Returns `VarianceError::TotalsOverflow` if a total does not fit in a
    /// `Decimal`.
    pub fn from_results(results: &[VarianceResult]) -> Result<Self, VarianceError> {
        let rows: Vec<&VarianceResult> = results.iter().collect();
        let totals = Totals::of(&rows)?;

        let by_category = VarianceCategory::ALL
            .into_iter()
            .map(|category| CategoryCount {
                category,
                count: results.iter().filter(|r| r.category == category).count(),
            })
            .collect();

        let mut by_center: BTreeMap<CostCenter, Vec<&VarianceResult>> = BTreeMap::new();
        let mut by_quarter: BTreeMap<(i32, FiscalQuarter), Vec<&VarianceResult>> = BTreeMap::new();
        for result in results {
            by_center.entry(result.cost_center).or_default().push(result);
            by_quarter
                .entry((result.period.fiscal_year(), result.period.fiscal_quarter()))
                .or_default()
                .push(result);
        }

        let cost_centers = by_center
            .into_iter()
            .map(|(cost_center, rows)| CostCenterSummary::from_rows(cost_center, &rows))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .flatten()
            .collect();

        let fiscal_quarters = by_quarter
            .into_iter()
            .map(|((fiscal_year, quarter), rows)| {
                let totals = Totals::of(&rows)?;
                Ok(QuarterSummary {
                    fiscal_year,
                    quarter,
                    records: rows.len(),
                    total_budgeted: totals.budgeted,
                    total_actual: totals.actual,
                    variance_pct: totals.variance_pct,
                    flagged: totals.flagged,
                })
            })
            .collect::<Result<_, VarianceError>>()?;

        Ok(Self {
            records: results.len(),
            flagged: totals.flagged,
            by_category,
            total_budgeted: totals.budgeted,
            total_actual: totals.actual,
            total_variance: totals.variance,
            variance_pct: totals.variance_pct,
            cost_centers,
            fiscal_quarters,
        })
    }

    /// Count for a single category.
    #[must_use]
    pub fn count(&self, category: VarianceCategory) -> usize {
        self.by_category
            .iter()
            .find(|c| c.category == category)
            .map_or(0, |c| c.count)
    }

    /// Breakdown for a single cost center, if it reported.
    #[must_use]
    pub fn cost_center(&self, cost_center: CostCenter) -> Option<&CostCenterSummary> {
        self.cost_centers
            .iter()
            .find(|s| s.cost_center == cost_center)
    }
}

impl CostCenterSummary {
    fn from_rows(
        cost_center: CostCenter,
        rows: &[&VarianceResult],
    ) -> Result<Option<Self>, VarianceError> {
        let Some(worst_category) = rows
            .iter()
            .map(|r| r.category)
            .max_by_key(|c| c.severity())
        else {
            return Ok(None);
        };

        let totals = Totals::of(rows)?;

        Ok(Some(Self {
            cost_center,
            name: cost_center.name(),
            periods: rows.len(),
            total_budgeted: totals.budgeted,
            total_actual: totals.actual,
            total_variance: totals.variance,
            variance_pct: totals.variance_pct,
            flagged: totals.flagged,
            worst_category,
        }))
    }
}

/// Amounts shared by every level of the summary.
struct Totals {
    budgeted: Decimal,
    actual: Decimal,
    variance: Decimal,
    variance_pct: Decimal,
    flagged: usize,
}

impl Totals {
    fn of(rows: &[&VarianceResult]) -> Result<Self, VarianceError> {
        let sum = |amount: fn(&VarianceResult) -> Decimal| {
            rows.iter()
                .try_fold(Decimal::ZERO, |total, row| total.checked_add(amount(row)))
                .ok_or(VarianceError::TotalsOverflow)
        };

        let budgeted = sum(|r: &VarianceResult| r.budgeted_amount)?;
        let actual = sum(|r: &VarianceResult| r.actual_amount)?;
        let variance = actual
            .checked_sub(budgeted)
            .ok_or(VarianceError::TotalsOverflow)?;
        // No budget at all reads as no variance.
        let variance_pct = if budgeted.is_zero() {
            Decimal::ZERO
        } else {
            percent_of(variance, budgeted).ok_or(VarianceError::TotalsOverflow)?
        };

        Ok(Self {
            budgeted,
            actual,
            variance,
            variance_pct,
            flagged: rows.iter().filter(|r| r.needs_attention).count(),
        })
    }
}
