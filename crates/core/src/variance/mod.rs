//! Budget variance calculation and severity classification.

pub mod category;
pub mod classifier;
pub mod error;
pub mod summary;
pub mod thresholds;
pub mod types;


pub use category::VarianceCategory;
pub use classifier::VarianceClassifier;
pub use error::VarianceError;
pub use summary::{CategoryCount, CostCenterSummary, QuarterSummary, VarianceSummary};
pub use thresholds::{Bound, Breakpoint, VarianceThresholds};
pub use types::{SpendingRecord, VarianceResult};
