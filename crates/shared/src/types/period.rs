//! Reporting period types.
//!
//! Budgets are reported monthly. The fiscal year runs July through June and is
//! named after the calendar year it ends in, so July 2023 belongs to FY2024.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// First calendar month of a fiscal year.
pub const FISCAL_YEAR_START_MONTH: u32 = 7;

/// Errors from building or parsing a [`FiscalMonth`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    /// Month outside 1-12.
    #[error("Month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),

    /// Text that is not `YYYY-MM`.
    #[error("Expected a period formatted as YYYY-MM, got {0:?}")]
    Malformed(String),
}

/// Fiscal quarter within a July-June fiscal year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FiscalQuarter {
    /// July to September.
    Q1,
    /// October to December.
    Q2,
    /// January to March.
    Q3,
    /// April to June.
    Q4,
}

impl std::fmt::Display for FiscalQuarter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Q1 => write!(f, "Q1"),
            Self::Q2 => write!(f, "Q2"),
            Self::Q3 => write!(f, "Q3"),
            Self::Q4 => write!(f, "Q4"),
        }
    }
}

/// One calendar month used as a reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FiscalMonth {
    year: i32,
    month: u32,
}

impl FiscalMonth {
    /// Creates a period for the given calendar year and month.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidMonth` if `month` is not in 1-12.
    pub const fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if month == 0 || month > 12 {
            return Err(PeriodError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month (1-12).
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// Fiscal year this month reports into (e.g. 2024 for July 2023).
    #[must_use]
    pub const fn fiscal_year(&self) -> i32 {
        if self.month >= FISCAL_YEAR_START_MONTH {
            self.year + 1
        } else {
            self.year
        }
    }

    /// Fiscal quarter this month reports into.
    #[must_use]
    pub const fn fiscal_quarter(&self) -> FiscalQuarter {
        // Shift so July is 0, then bucket by three.
        match ((self.month + 12 - FISCAL_YEAR_START_MONTH) % 12) / 3 {
            0 => FiscalQuarter::Q1,
            1 => FiscalQuarter::Q2,
            2 => FiscalQuarter::Q3,
            _ => FiscalQuarter::Q4,
        }
    }

    /// The following month.
    #[must_use]
    pub const fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl std::fmt::Display for FiscalMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for FiscalMonth {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || PeriodError::Malformed(s.to_string());

        let (year, month) = s.trim().rsplit_once('-').ok_or_else(malformed)?;
        let year = year.parse::<i32>().map_err(|_| malformed())?;
        let month = month.parse::<u32>().map_err(|_| malformed())?;

        Self::new(year, month)
    }
}

impl TryFrom<String> for FiscalMonth {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FiscalMonth> for String {
    fn from(value: FiscalMonth) -> Self {
        value.to_string()
    }
}
