//! Variance thresholds and the breakpoint table derived from them.
//!
//! Thresholds are percentages of budget headroom: positive values mean money
//! left unspent, negative values mean spending past the budget.

use rust_decimal::Decimal;
use serde::Serialize;
use varwatch_shared::config::ThresholdsConfig;

use super::category::VarianceCategory;
use super::error::VarianceError;

/// Validated, strictly ordered variance thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VarianceThresholds {
    significantly_over: Decimal,
    slightly_over: Decimal,
    slightly_under: Decimal,
    significantly_under: Decimal,
}

impl VarianceThresholds {
    /// Creates thresholds, enforcing
    /// `significantly_over < slightly_over < slightly_under < significantly_under`.
    ///
    /// # Errors
    ///
    /// Returns `VarianceError::InvalidThresholds` if the ordering is violated.
    pub fn new(
        significantly_over: Decimal,
        slightly_over: Decimal,
        slightly_under: Decimal,
        significantly_under: Decimal,
    ) -> Result<Self, VarianceError> {
        let ordered = significantly_over < slightly_over
            && slightly_over < slightly_under
            && slightly_under < significantly_under;

        if !ordered {
            return Err(VarianceError::InvalidThresholds {
                significantly_over,
                slightly_over,
                slightly_under,
                significantly_under,
            });
        }

        Ok(Self {
            significantly_over,
            slightly_over,
            slightly_under,
            significantly_under,
        })
    }

    /// Severe overrun threshold (inclusive).
    #[must_use]
    pub const fn significantly_over(&self) -> Decimal {
        self.significantly_over
    }

    /// Mild overrun threshold (inclusive).
    #[must_use]
    pub const fn slightly_over(&self) -> Decimal {
        self.slightly_over
    }

    /// Mild underspend threshold (inclusive).
    #[must_use]
    pub const fn slightly_under(&self) -> Decimal {
        self.slightly_under
    }

    /// Severe underspend threshold (inclusive).
    #[must_use]
    pub const fn significantly_under(&self) -> Decimal {
        self.significantly_under
    }

    /// Breakpoints in evaluation order. The first match wins; anything that
    /// matches none is `WithinTarget`.
    #[must_use]
    pub const fn breakpoints(&self) -> [Breakpoint; 4] {
        [
            Breakpoint {
                bound: Bound::AtMost(self.significantly_over),
                category: VarianceCategory::SignificantlyOverrun,
            },
            Breakpoint {
                bound: Bound::AtMost(self.slightly_over),
                category: VarianceCategory::SlightlyOverrun,
            },
            Breakpoint {
                bound: Bound::AtLeast(self.significantly_under),
                category: VarianceCategory::SignificantlyUnderspending,
            },
            Breakpoint {
                bound: Bound::AtLeast(self.slightly_under),
                category: VarianceCategory::SlightlyUnderspending,
            },
        ]
    }
}

impl Default for VarianceThresholds {
    fn default() -> Self {
        Self {
            significantly_over: Decimal::from(-10),
            slightly_over: Decimal::from(-5),
            slightly_under: Decimal::from(15),
            significantly_under: Decimal::from(25),
        }
    }
}

impl TryFrom<&ThresholdsConfig> for VarianceThresholds {
    type Error = VarianceError;

    fn try_from(config: &ThresholdsConfig) -> Result<Self, Self::Error> {
        Self::new(
            config.significantly_over,
            config.slightly_over,
            config.slightly_under,
            config.significantly_under,
        )
    }
}

/// Inclusive comparison against a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Matches values less than or equal to the threshold.
    AtMost(Decimal),
    /// Matches values greater than or equal to the threshold.
    AtLeast(Decimal),
}

/// One step of the classification table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoint {
    /// Comparison that selects this step.
    pub bound: Bound,
    /// Category assigned when the comparison holds.
    pub category: VarianceCategory,
}

impl Breakpoint {
    /// Returns true if `headroom_pct` falls on this step.
    #[must_use]
    pub fn matches(&self, headroom_pct: Decimal) -> bool {
        match self.bound {
            Bound::AtMost(threshold) => headroom_pct <= threshold,
            Bound::AtLeast(threshold) => headroom_pct >= threshold,
        }
    }
}
