//! Variance severity categories.

use serde::{Deserialize, Serialize};

/// Severity of a budget variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceCategory {
    /// Overspend far enough past budget to be flagged.
    SignificantlyOverrun,
    /// Mild overspend.
    SlightlyOverrun,
    /// Inside the tolerated band.
    WithinTarget,
    /// Mild underspend.
    SlightlyUnderspending,
    /// Underspend large enough to be flagged.
    SignificantlyUnderspending,
}

impl VarianceCategory {
    /// All categories from most overspent to most underspent.
    pub const ALL: [Self; 5] = [
        Self::SignificantlyOverrun,
        Self::SlightlyOverrun,
        Self::WithinTarget,
        Self::SlightlyUnderspending,
        Self::SignificantlyUnderspending,
    ];

    /// Whether records in this category are queued for review.
    #[must_use]
    pub const fn needs_attention(self) -> bool {
        matches!(
            self,
            Self::SignificantlyOverrun | Self::SignificantlyUnderspending
        )
    }

    /// Review priority, higher is worse.
    ///
    /// Overspend ranks above underspend of the same magnitude.
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::WithinTarget => 0,
            Self::SlightlyUnderspending => 1,
            Self::SlightlyOverrun => 2,
            Self::SignificantlyUnderspending => 3,
            Self::SignificantlyOverrun => 4,
        }
    }

    /// Report label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SignificantlyOverrun => "Significantly Overrun",
            Self::SlightlyOverrun => "Slightly Overrun",
            Self::WithinTarget => "Within Target",
            Self::SlightlyUnderspending => "Slightly Underspending",
            Self::SignificantlyUnderspending => "Significantly Underspending",
        }
    }
}

impl std::fmt::Display for VarianceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
