//! Variance data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use varwatch_shared::types::{CostCenter, FiscalMonth};

use super::category::VarianceCategory;

/// Budget and actual spend for one cost center in one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingRecord {
    /// Reporting period.
    pub period: FiscalMonth,
    /// Cost center the spend was booked to.
    pub cost_center: CostCenter,
    /// Budgeted amount.
    pub budgeted_amount: Decimal,
    /// Actual amount spent.
    pub actual_amount: Decimal,
}

impl SpendingRecord {
    /// Creates a record.
    #[must_use]
    pub const fn new(
        period: FiscalMonth,
        cost_center: CostCenter,
        budgeted_amount: Decimal,
        actual_amount: Decimal,
    ) -> Self {
        Self {
            period,
            cost_center,
            budgeted_amount,
            actual_amount,
        }
    }
}

/// Classified variance for one spending record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarianceResult {
    /// Reporting period.
    pub period: FiscalMonth,
    /// Cost center.
    pub cost_center: CostCenter,
    /// Budgeted amount.
    pub budgeted_amount: Decimal,
    /// Actual amount.
    pub actual_amount: Decimal,
    /// Variance amount (actual - budgeted). Positive means overspent.
    pub variance_amount: Decimal,
    /// Variance as a percentage of budget, 2 decimal places.
    pub variance_pct: Decimal,
    /// Spending rate (actual / budgeted * 100), 2 decimal places.
    pub spending_rate_pct: Decimal,
    /// Severity category.
    pub category: VarianceCategory,
    /// Whether the record is queued for review.
    pub needs_attention: bool,
}
