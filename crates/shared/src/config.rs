//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Longest sample horizon the generator accepts, in months.
pub const MAX_SAMPLE_MONTHS: u32 = 120;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Variance threshold configuration.
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
    /// Sample data configuration.
    #[serde(default)]
    pub sample: SampleConfig,
    /// Report rendering configuration.
    #[serde(default)]
    pub report: ReportConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Raw variance thresholds, in percent of budget headroom.
///
/// Negative values mean over budget. Ordering is validated when the
/// classifier is built, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ThresholdsConfig {
    /// At or below this the overrun is flagged.
    #[serde(default = "default_significantly_over")]
    pub significantly_over: Decimal,
    /// At or below this the overrun is mild.
    #[serde(default = "default_slightly_over")]
    pub slightly_over: Decimal,
    /// At or above this the underspend is mild.
    #[serde(default = "default_slightly_under")]
    pub slightly_under: Decimal,
    /// At or above this the underspend is flagged.
    #[serde(default = "default_significantly_under")]
    pub significantly_under: Decimal,
}

fn default_significantly_over() -> Decimal {
    Decimal::from(-10)
}

fn default_slightly_over() -> Decimal {
    Decimal::from(-5)
}

fn default_slightly_under() -> Decimal {
    Decimal::from(15)
}

fn default_significantly_under() -> Decimal {
    Decimal::from(25)
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            significantly_over: default_significantly_over(),
            slightly_over: default_slightly_over(),
            slightly_under: default_slightly_under(),
            significantly_under: default_significantly_under(),
        }
    }
}

/// Sample data generator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SampleConfig {
    /// RNG seed, fixed for reproducible reports.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Calendar year of the first generated month.
    #[serde(default = "default_start_year")]
    pub start_year: i32,
    /// Calendar month (1-12) of the first generated month.
    #[serde(default = "default_start_month")]
    pub start_month: u32,
    /// Number of consecutive months to generate.
    #[serde(default = "default_months")]
    pub months: u32,
}

fn default_seed() -> u64 {
    42
}

fn default_start_year() -> i32 {
    2023
}

fn default_start_month() -> u32 {
    7 // start of FY2024
}

fn default_months() -> u32 {
    18
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            start_year: default_start_year(),
            start_month: default_start_month(),
            months: default_months(),
        }
    }
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Machine-readable JSON document.
    Json,
    /// Plain text table.
    #[default]
    Table,
}

/// Report rendering configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: ReportFormat,
    /// Only render rows that need attention.
    #[serde(default)]
    pub flagged_only: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "varwatch=info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or fails validation.
    pub fn load() -> AppResult<Self> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("VARWATCH").separator("__"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that the type system cannot express.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the sample window is out of range.
    pub fn validate(&self) -> AppResult<()> {
        if !(1..=12).contains(&self.sample.start_month) {
            return Err(AppError::Validation(format!(
                "sample.start_month must be between 1 and 12, got {}",
                self.sample.start_month
            )));
        }

        if !(1..=MAX_SAMPLE_MONTHS).contains(&self.sample.months) {
            return Err(AppError::Validation(format!(
                "sample.months must be between 1 and {MAX_SAMPLE_MONTHS}, got {}",
                self.sample.months
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    const VARS: [&str; 6] = [
        "RUN_MODE",
        "VARWATCH__THRESHOLDS__SLIGHTLY_UNDER",
        "VARWATCH__SAMPLE__SEED",
        "VARWATCH__SAMPLE__MONTHS",
        "VARWATCH__REPORT__FORMAT",
        "VARWATCH__REPORT__FLAGGED_ONLY",
    ];

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.thresholds.significantly_over, dec!(-10));
        assert_eq!(config.thresholds.slightly_over, dec!(-5));
        assert_eq!(config.thresholds.slightly_under, dec!(15));
        assert_eq!(config.thresholds.significantly_under, dec!(25));
        assert_eq!(config.sample.seed, 42);
        assert_eq!(config.sample.start_year, 2023);
        assert_eq!(config.sample.start_month, 7);
        assert_eq!(config.sample.months, 18);
        assert_eq!(config.report.format, ReportFormat::Table);
        assert!(!config.report.flagged_only);
        assert_eq!(config.log.filter, "varwatch=info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_without_sources_uses_defaults() {
        temp_env::with_vars_unset(VARS, || {
            let config = AppConfig::load().unwrap();
            assert_eq!(config.thresholds, ThresholdsConfig::default());
            assert_eq!(config.sample, SampleConfig::default());
        });
    }

    #[test]
    fn test_load_environment_overrides() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test")),
                ("VARWATCH__THRESHOLDS__SLIGHTLY_UNDER", Some("12.5")),
                ("VARWATCH__SAMPLE__SEED", Some("7")),
                ("VARWATCH__SAMPLE__MONTHS", Some("24")),
                ("VARWATCH__REPORT__FORMAT", Some("json")),
                ("VARWATCH__REPORT__FLAGGED_ONLY", Some("true")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.thresholds.slightly_under, dec!(12.5));
                assert_eq!(config.thresholds.significantly_under, dec!(25));
                assert_eq!(config.sample.seed, 7);
                assert_eq!(config.sample.months, 24);
                assert_eq!(config.report.format, ReportFormat::Json);
                assert!(config.report.flagged_only);
            },
        );
    }

    #[test]
    fn test_load_rejects_out_of_range_months() {
        temp_env::with_vars([("VARWATCH__SAMPLE__MONTHS", Some("0"))], || {
            let err = AppConfig::load().unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
            assert_eq!(err.exit_code(), 65);
        });
    }

    #[test]
    fn test_load_rejects_unparsable_value() {
        temp_env::with_vars([("VARWATCH__SAMPLE__SEED", Some("not-a-number"))], || {
            let err = AppConfig::load().unwrap_err();
            assert!(matches!(err, AppError::Configuration(_)));
            assert_eq!(err.exit_code(), 78);
        });
    }

    #[rstest]
    #[case(0, 18, false)]
    #[case(13, 18, false)]
    #[case(1, 0, false)]
    #[case(7, MAX_SAMPLE_MONTHS + 1, false)]
    #[case(1, 1, true)]
    #[case(12, MAX_SAMPLE_MONTHS, true)]
    fn test_validate_sample_window(#[case] start_month: u32, #[case] months: u32, #[case] ok: bool) {
        let mut config = AppConfig::default();
        config.sample.start_month = start_month;
        config.sample.months = months;

        assert_eq!(config.validate().is_ok(), ok);
    }
}
