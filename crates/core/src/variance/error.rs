//! Variance error types.

use rust_decimal::Decimal;
use thiserror::Error;
use varwatch_shared::AppError;
use varwatch_shared::types::{CostCenter, FiscalMonth};

/// Variance-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VarianceError {
    /// Thresholds are not strictly ordered.
    #[error(
        "Variance thresholds must satisfy significantly_over < slightly_over < slightly_under < significantly_under, got {significantly_over} / {slightly_over} / {slightly_under} / {significantly_under}"
    )]
    InvalidThresholds {
        /// Severe overrun threshold.
        significantly_over: Decimal,
        /// Mild overrun threshold.
        slightly_over: Decimal,
        /// Mild underspend threshold.
        slightly_under: Decimal,
        /// Severe underspend threshold.
        significantly_under: Decimal,
    },

    /// Budget is zero so no ratio exists.
    #[error("Budgeted amount is zero for {cost_center} in {period}; variance percentage is undefined")]
    ZeroBudget {
        /// Reporting period of the offending record.
        period: FiscalMonth,
        /// Cost center of the offending record.
        cost_center: CostCenter,
    },

    /// A metric for the record does not fit in a `Decimal`.
    #[error("Variance of {cost_center} in {period} is outside the representable decimal range")]
    Overflow {
        /// Reporting period of the offending record.
        period: FiscalMonth,
        /// Cost center of the offending record.
        cost_center: CostCenter,
    },

    /// Summary totals do not fit in a `Decimal`.
    #[error("Summary totals are outside the representable decimal range")]
    TotalsOverflow,
}

impl From<VarianceError> for AppError {
    fn from(err: VarianceError) -> Self {
        match err {
            VarianceError::InvalidThresholds { .. } => Self::Configuration(err.to_string()),
            VarianceError::ZeroBudget { .. }
            | VarianceError::Overflow { .. }
            | VarianceError::TotalsOverflow => Self::Computation(err.to_string()),
        }
    }
}
