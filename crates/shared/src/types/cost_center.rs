//! Cost center catalogue.
//!
//! The set of cost centers is closed: adding one is a code change, not a
//! configuration change.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A municipal environmental program budget category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CostCenter {
    /// Air Quality Monitoring
    AirQuality,
    /// Water Quality Testing
    WaterTesting,
    /// Waste Management
    WasteMgmt,
    /// Sustainability Programs
    Sustainability,
    /// Environmental Compliance
    Compliance,
}

impl CostCenter {
    /// Every cost center, in reporting order.
    pub const ALL: [Self; 5] = [
        Self::AirQuality,
        Self::WaterTesting,
        Self::WasteMgmt,
        Self::Sustainability,
        Self::Compliance,
    ];

    /// Returns the short ledger code (e.g. `AIR_QUALITY`).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::AirQuality => "AIR_QUALITY",
            Self::WaterTesting => "WATER_TESTING",
            Self::WasteMgmt => "WASTE_MGMT",
            Self::Sustainability => "SUSTAINABILITY",
            Self::Compliance => "COMPLIANCE",
        }
    }

    /// Returns the human-readable program name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AirQuality => "Air Quality Monitoring",
            Self::WaterTesting => "Water Quality Testing",
            Self::WasteMgmt => "Waste Management",
            Self::Sustainability => "Sustainability Programs",
            Self::Compliance => "Environmental Compliance",
        }
    }

    /// Returns the baseline monthly budget (annual allocation / 12, rounded).
    #[must_use]
    pub fn base_monthly_budget(self) -> Decimal {
        match self {
            Self::AirQuality => Decimal::from(37_500),     // $450K annual
            Self::WaterTesting => Decimal::from(26_667),   // $320K annual
            Self::WasteMgmt => Decimal::from(23_333),      // $280K annual
            Self::Sustainability => Decimal::from(18_333), // $220K annual
            Self::Compliance => Decimal::from(31_667),     // $380K annual
        }
    }
}

impl std::fmt::Display for CostCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for CostCenter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AIR_QUALITY" => Ok(Self::AirQuality),
            "WATER_TESTING" => Ok(Self::WaterTesting),
            "WASTE_MGMT" => Ok(Self::WasteMgmt),
            "SUSTAINABILITY" => Ok(Self::Sustainability),
            "COMPLIANCE" => Ok(Self::Compliance),
            _ => Err(format!("Unknown cost center: {s}")),
        }
    }
}
