//! Seeded sample spending data.
//!
//! Every figure produced here is made up. Budgets are the catalogue baseline;
//! actuals are the baseline bent by a seasonal factor, a uniform wobble, and
//! an occasional spike.

use rand::prelude::*;
use rust_decimal::Decimal;
use varwatch_core::variance::SpendingRecord;
use varwatch_shared::config::SampleConfig;
use varwatch_shared::types::{CostCenter, FiscalMonth};
use varwatch_shared::{AppError, AppResult};

/// Decimal scale of a basis point figure (1 bp = 0.0001).
const BASIS_POINT_SCALE: u32 = 4;

/// Uniform wobble applied to every month, in basis points.
const WOBBLE_BP: (i64, i64) = (7_000, 13_000);
/// Chance (percent) that a month carries a spike.
const SPIKE_CHANCE_PCT: u32 = 10;
/// Chance (percent) that a spike is an overrun rather than an underspend.
const SPIKE_OVER_PCT: u32 = 60;
/// Overrun spike multiplier range, in basis points.
const SPIKE_OVER_BP: (i64, i64) = (13_000, 16_000);
/// Underspend spike multiplier range, in basis points.
const SPIKE_UNDER_BP: (i64, i64) = (4_000, 7_000);

/// Seasonal spending multiplier for a calendar month.
///
/// Fall programs run hot, June carries the fiscal year-end spend-down, and
/// July/August are quiet.
#[must_use]
pub fn seasonal_factor(month: u32) -> Decimal {
    match month {
        10 | 11 => Decimal::new(12, 1),
        6 => Decimal::new(14, 1),
        7 | 8 => Decimal::new(8, 1),
        _ => Decimal::ONE,
    }
}

/// Deterministic generator of spending records.
pub struct SampleGenerator {
    start: FiscalMonth,
    months: u32,
    rng: StdRng,
}

impl SampleGenerator {
    /// Creates a generator from configuration.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the start month is invalid.
    pub fn new(config: SampleConfig) -> AppResult<Self> {
        let start = FiscalMonth::new(config.start_year, config.start_month)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        Ok(Self {
            start,
            months: config.months,
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    /// Generates one record per month per cost center, month-major.
    pub fn generate(&mut self) -> Vec<SpendingRecord> {
        let mut records = Vec::new();

        let mut period = self.start;
        for _ in 0..self.months {
            for cost_center in CostCenter::ALL {
                let budget = cost_center.base_monthly_budget();
                let actual = self.actual_spend(budget, period.month());
                records.push(SpendingRecord::new(
                    period,
                    cost_center,
                    budget.round_dp(2),
                    actual.round_dp(2),
                ));
            }
            period = period.next();
        }

        records
    }

    fn actual_spend(&mut self, budget: Decimal, month: u32) -> Decimal {
        let mut actual = budget * seasonal_factor(month) * self.factor(WOBBLE_BP);

        if self.rng.random_range(0..100) < SPIKE_CHANCE_PCT {
            if self.rng.random_range(0..100) < SPIKE_OVER_PCT {
                actual *= self.factor(SPIKE_OVER_BP);
            } else {
                actual *= self.factor(SPIKE_UNDER_BP);
            }
        }

        actual
    }

    /// Uniform multiplier drawn in basis points, inclusive on both ends.
    fn factor(&mut self, (low, high): (i64, i64)) -> Decimal {
        Decimal::new(self.rng.random_range(low..=high), BASIS_POINT_SCALE)
    }
}
