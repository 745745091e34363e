//! Common domain types used across the workspace.

pub mod cost_center;
pub mod period;

pub use cost_center::CostCenter;
pub use period::{FiscalMonth, FiscalQuarter, PeriodError};
