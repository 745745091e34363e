//! Variance classifier: metric calculation and severity assignment.

use rayon::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

use super::category::VarianceCategory;
use super::error::VarianceError;
use super::thresholds::{Breakpoint, VarianceThresholds};
use super::types::{SpendingRecord, VarianceResult};

/// Decimal places kept on percentages.
pub const PERCENT_DECIMAL_PLACES: u32 = 2;

/// Classifies spending records against a fixed set of thresholds.
///
/// The classifier holds no mutable state, so one instance can be shared
/// freely across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarianceClassifier {
    thresholds: VarianceThresholds,
    breakpoints: [Breakpoint; 4],
}

impl VarianceClassifier {
    /// Creates a classifier for already validated thresholds.
    #[must_use]
    pub const fn new(thresholds: VarianceThresholds) -> Self {
        Self {
            breakpoints: thresholds.breakpoints(),
            thresholds,
        }
    }

    /// Creates a classifier from raw threshold values.
    ///
    /// # Errors
    ///
    /// Returns `VarianceError::InvalidThresholds` if the values are not
    /// strictly ordered.
    pub fn with_thresholds(
        significantly_over: Decimal,
        slightly_over: Decimal,
        slightly_under: Decimal,
        significantly_under: Decimal,
    ) -> Result<Self, VarianceError> {
        VarianceThresholds::new(
            significantly_over,
            slightly_over,
            slightly_under,
            significantly_under,
        )
        .map(Self::new)
    }

    /// Returns the thresholds in use.
    #[must_use]
    pub const fn thresholds(&self) -> &VarianceThresholds {
        &self.thresholds
    }

    /// Maps a budget headroom percentage to its category.
    ///
    /// Headroom is the share of budget left unspent: `-10` means spending ran
    /// 10% past budget, `+25` means a quarter of the budget went unused.
    /// Thresholds are inclusive on the more severe side.
    #[must_use]
    pub fn classify_headroom(&self, headroom_pct: Decimal) -> VarianceCategory {
        self.breakpoints
            .iter()
            .find(|breakpoint| breakpoint.matches(headroom_pct))
            .map_or(VarianceCategory::WithinTarget, |breakpoint| {
                breakpoint.category
            })
    }

    /// Maps a `variance_pct` (positive when overspent) to its category.
    #[must_use]
    pub fn classify_variance(&self, variance_pct: Decimal) -> VarianceCategory {
        self.classify_headroom(-variance_pct)
    }

    /// Computes and classifies the variance of one record.
    ///
    /// `variance_pct` is positive when spending exceeded the budget.
    ///
    /// # Errors
    ///
    /// Returns `VarianceError::ZeroBudget` if the record has no budget, or
    /// `VarianceError::Overflow` if a metric does not fit in a `Decimal`.
    pub fn evaluate(&self, record: &SpendingRecord) -> Result<VarianceResult, VarianceError> {
        let budgeted = record.budgeted_amount;
        let actual = record.actual_amount;

        if budgeted.is_zero() {
            return Err(VarianceError::ZeroBudget {
                period: record.period,
                cost_center: record.cost_center,
            });
        }

        let overflow = || VarianceError::Overflow {
            period: record.period,
            cost_center: record.cost_center,
        };

        let variance_amount = actual.checked_sub(budgeted).ok_or_else(overflow)?;
        let variance_pct = percent_of(variance_amount, budgeted).ok_or_else(overflow)?;
        let spending_rate_pct = percent_of(actual, budgeted).ok_or_else(overflow)?;
        let category = self.classify_variance(variance_pct);

        Ok(VarianceResult {
            period: record.period,
            cost_center: record.cost_center,
            budgeted_amount: budgeted,
            actual_amount: actual,
            variance_amount,
            variance_pct,
            spending_rate_pct,
            category,
            needs_attention: category.needs_attention(),
        })
    }

    /// Evaluates every record, in parallel, keeping input order.
    ///
    /// Fails fast: if any record cannot be evaluated the whole batch is
    /// rejected with the error of the earliest such record.
    ///
    /// # Errors
    ///
    /// Returns the error of the first record that fails `evaluate`.
    pub fn evaluate_batch(
        &self,
        records: &[SpendingRecord],
    ) -> Result<Vec<VarianceResult>, VarianceError> {
        self.evaluate_each(records).into_iter().collect()
    }

    /// Evaluates every record, in parallel, keeping input order, and returns
    /// one outcome per record so callers can report failures and continue.
    #[must_use]
    pub fn evaluate_each(
        &self,
        records: &[SpendingRecord],
    ) -> Vec<Result<VarianceResult, VarianceError>> {
        records
            .par_iter()
            .map(|record| self.evaluate(record))
            .collect()
    }
}

impl Default for VarianceClassifier {
    fn default() -> Self {
        Self::new(VarianceThresholds::default())
    }
}

/// `part / whole * 100`, rounded half away from zero.
///
/// `None` when `whole` is zero or the result leaves the `Decimal` range.
pub(crate) fn percent_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    part.checked_div(whole)?
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|pct| {
            pct.round_dp_with_strategy(PERCENT_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use varwatch_shared::types::{CostCenter, FiscalMonth};

    fn record(budgeted: Decimal, actual: Decimal) -> SpendingRecord {
        SpendingRecord::new(
            FiscalMonth::new(2023, 10).unwrap(),
            CostCenter::AirQuality,
            budgeted,
            actual,
        )
    }

    #[rstest]
    #[case(dec!(11200), dec!(12.00), VarianceCategory::SignificantlyOverrun, true)]
    #[case(dec!(10600), dec!(6.00), VarianceCategory::SlightlyOverrun, false)]
    #[case(dec!(10000), dec!(0.00), VarianceCategory::WithinTarget, false)]
    #[case(dec!(8700), dec!(-13.00), VarianceCategory::WithinTarget, false)]
    #[case(dec!(8500), dec!(-15.00), VarianceCategory::SlightlyUnderspending, false)]
    #[case(dec!(7000), dec!(-30.00), VarianceCategory::SignificantlyUnderspending, true)]
    fn test_evaluate_default_scenarios(
        #[case] actual: Decimal,
        #[case] variance_pct: Decimal,
        #[case] category: VarianceCategory,
        #[case] needs_attention: bool,
    ) {
        let result = VarianceClassifier::default()
            .evaluate(&record(dec!(10000), actual))
            .unwrap();

        assert_eq!(result.variance_pct, variance_pct);
        assert_eq!(result.category, category);
        assert_eq!(result.needs_attention, needs_attention);
    }

    #[test]
    fn test_evaluate_metrics() {
        let result = VarianceClassifier::default()
            .evaluate(&record(dec!(10000), dec!(11200)))
            .unwrap();

        assert_eq!(result.budgeted_amount, dec!(10000));
        assert_eq!(result.actual_amount, dec!(11200));
        assert_eq!(result.variance_amount, dec!(1200));
        assert_eq!(result.spending_rate_pct, dec!(112.00));
        assert_eq!(result.period, FiscalMonth::new(2023, 10).unwrap());
        assert_eq!(result.cost_center, CostCenter::AirQuality);
    }

    #[test]
    fn test_evaluate_zero_budget_fails() {
        let err = VarianceClassifier::default()
            .evaluate(&record(dec!(0), dec!(500)))
            .unwrap_err();

        assert_eq!(
            err,
            VarianceError::ZeroBudget {
                period: FiscalMonth::new(2023, 10).unwrap(),
                cost_center: CostCenter::AirQuality,
            }
        );
    }

    #[rstest]
    #[case::quotient_overflows(dec!(0.01), Decimal::from_i128_with_scale(10_i128.pow(27), 0))]
    #[case::percent_overflows(dec!(0.01), Decimal::from_i128_with_scale(10_i128.pow(25), 0))]
    #[case::negative_quotient_overflows(dec!(0.01), -Decimal::from_i128_with_scale(10_i128.pow(27), 0))]
    #[case::difference_overflows(dec!(-1), Decimal::MAX)]
    fn test_evaluate_extreme_ratio_fails(#[case] budgeted: Decimal, #[case] actual: Decimal) {
        let err = VarianceClassifier::default()
            .evaluate(&record(budgeted, actual))
            .unwrap_err();

        assert_eq!(
            err,
            VarianceError::Overflow {
                period: FiscalMonth::new(2023, 10).unwrap(),
                cost_center: CostCenter::AirQuality,
            }
        );
    }

    #[test]
    fn test_batch_rejects_overflowing_record() {
        let records = [
            record(dec!(100), dec!(90)),
            record(dec!(0.01), Decimal::MAX),
        ];

        let err = VarianceClassifier::default()
            .evaluate_batch(&records)
            .unwrap_err();
        assert!(matches!(err, VarianceError::Overflow { .. }));
    }

    #[test]
    fn test_classify_variance_flips_sign() {
        let classifier = VarianceClassifier::default();

        assert_eq!(
            classifier.classify_variance(dec!(12)),
            VarianceCategory::SignificantlyOverrun
        );
        assert_eq!(
            classifier.classify_variance(dec!(-30)),
            VarianceCategory::SignificantlyUnderspending
        );
        assert_eq!(
            classifier.classify_headroom(dec!(12)),
            VarianceCategory::WithinTarget
        );
    }

    #[test]
    fn test_zero_actual_is_full_underspend() {
        let result = VarianceClassifier::default()
            .evaluate(&record(dec!(2500), dec!(0)))
            .unwrap();

        assert_eq!(result.variance_pct, dec!(-100.00));
        assert_eq!(result.spending_rate_pct, dec!(0.00));
        assert_eq!(result.category, VarianceCategory::SignificantlyUnderspending);
    }

    #[test]
    fn test_rounding_is_half_up() {
        // 1.125% and 2.675% sit exactly on the midpoint.
        let classifier = VarianceClassifier::default();

        let up = classifier
            .evaluate(&record(dec!(8000), dec!(8090)))
            .unwrap();
        assert_eq!(up.variance_pct, dec!(1.13));

        let down = classifier
            .evaluate(&record(dec!(8000), dec!(7786)))
            .unwrap();
        assert_eq!(down.variance_pct, dec!(-2.68));
    }

    #[rstest]
    #[case(dec!(-10), VarianceCategory::SignificantlyOverrun)]
    #[case(dec!(-10.01), VarianceCategory::SignificantlyOverrun)]
    #[case(dec!(-9.99), VarianceCategory::SlightlyOverrun)]
    #[case(dec!(-5), VarianceCategory::SlightlyOverrun)]
    #[case(dec!(-4.99), VarianceCategory::WithinTarget)]
    #[case(dec!(0), VarianceCategory::WithinTarget)]
    #[case(dec!(14.99), VarianceCategory::WithinTarget)]
    #[case(dec!(15), VarianceCategory::SlightlyUnderspending)]
    #[case(dec!(24.99), VarianceCategory::SlightlyUnderspending)]
    #[case(dec!(25), VarianceCategory::SignificantlyUnderspending)]
    #[case(dec!(1000), VarianceCategory::SignificantlyUnderspending)]
    fn test_classify_boundaries(#[case] headroom: Decimal, #[case] expected: VarianceCategory) {
        assert_eq!(VarianceClassifier::default().classify_headroom(headroom), expected);
    }

    #[test]
    fn test_custom_thresholds() {
        let classifier =
            VarianceClassifier::with_thresholds(dec!(-3), dec!(-1), dec!(2), dec!(4)).unwrap();

        assert_eq!(classifier.classify_headroom(dec!(-3)), VarianceCategory::SignificantlyOverrun);
        assert_eq!(classifier.classify_headroom(dec!(-2)), VarianceCategory::SlightlyOverrun);
        assert_eq!(classifier.classify_headroom(dec!(1.5)), VarianceCategory::WithinTarget);
        assert_eq!(classifier.classify_headroom(dec!(3)), VarianceCategory::SlightlyUnderspending);
        assert_eq!(
            classifier.classify_headroom(dec!(4)),
            VarianceCategory::SignificantlyUnderspending
        );
        assert_eq!(classifier.thresholds().slightly_under(), dec!(2));
    }

    #[test]
    fn test_with_thresholds_rejects_unordered() {
        let result = VarianceClassifier::with_thresholds(dec!(-5), dec!(-10), dec!(15), dec!(25));
        assert!(matches!(result, Err(VarianceError::InvalidThresholds { .. })));
    }

    #[test]
    fn test_batch_preserves_order() {
        let records = [
            record(dec!(10000), dec!(11200)),
            record(dec!(10000), dec!(10000)),
            record(dec!(10000), dec!(7000)),
        ];

        let results = VarianceClassifier::default()
            .evaluate_batch(&records)
            .unwrap();

        assert_eq!(results.len(), 3);
        let categories: Vec<_> = results.iter().map(|r| r.category).collect();
        assert_eq!(
            categories,
            vec![
                VarianceCategory::SignificantlyOverrun,
                VarianceCategory::WithinTarget,
                VarianceCategory::SignificantlyUnderspending,
            ]
        );
    }

    #[test]
    fn test_batch_fails_fast_on_first_zero_budget() {
        let first_bad = SpendingRecord::new(
            FiscalMonth::new(2024, 1).unwrap(),
            CostCenter::Compliance,
            dec!(0),
            dec!(10),
        );
        let second_bad = SpendingRecord::new(
            FiscalMonth::new(2024, 2).unwrap(),
            CostCenter::WasteMgmt,
            dec!(0),
            dec!(20),
        );
        let records = [record(dec!(100), dec!(90)), first_bad, second_bad];

        let err = VarianceClassifier::default()
            .evaluate_batch(&records)
            .unwrap_err();

        assert_eq!(
            err,
            VarianceError::ZeroBudget {
                period: FiscalMonth::new(2024, 1).unwrap(),
                cost_center: CostCenter::Compliance,
            }
        );
    }

    #[test]
    fn test_evaluate_each_reports_per_record() {
        let records = [
            record(dec!(100), dec!(90)),
            record(dec!(0), dec!(5)),
            record(dec!(100), dec!(150)),
        ];

        let outcomes = VarianceClassifier::default().evaluate_each(&records);

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_ok());
        assert!(matches!(outcomes[1], Err(VarianceError::ZeroBudget { .. })));
        assert_eq!(
            outcomes[2].as_ref().unwrap().category,
            VarianceCategory::SignificantlyOverrun
        );
    }

    #[test]
    fn test_empty_batch() {
        let results = VarianceClassifier::default().evaluate_batch(&[]).unwrap();
        assert!(results.is_empty());
    }
}
