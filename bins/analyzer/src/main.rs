//! Varwatch variance analyzer
//!
//! Generates seeded sample spending for every cost center, classifies each
//! month's budget variance, and prints a report to stdout. Logs go to stderr.
//!
//! Usage: cargo run --bin varwatch

mod report;
mod sample;

use std::process::ExitCode;

use anyhow::Context;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use varwatch_core::variance::{VarianceClassifier, VarianceSummary, VarianceThresholds};
use varwatch_shared::config::LogConfig;
use varwatch_shared::{AppConfig, AppResult};

use report::Report;
use sample::SampleGenerator;

fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration; tracing is not up yet, so failures go to stderr
    let config = match load_config() {
        Ok(config) => config,
        Err(code) => return Ok(ExitCode::from(code)),
    };

    // Initialize tracing
    init_tracing(&config.log)?;

    match run(&config) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            error!(code = err.error_code(), error = %err, "Variance analysis failed");
            Ok(ExitCode::from(err.exit_code()))
        }
    }
}

/// Loads configuration, reporting a failure as the error's exit code.
fn load_config() -> Result<AppConfig, u8> {
    AppConfig::load().map_err(|err| {
        eprintln!("Failed to load configuration [{}]: {err}", err.error_code());
        err.exit_code()
    })
}

fn init_tracing(log: &LogConfig) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| log.filter.as_str().into());

    let json_layer = log
        .json
        .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!log.json)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .context("Failed to initialize tracing")
}

fn run(config: &AppConfig) -> AppResult<()> {
    let thresholds = VarianceThresholds::try_from(&config.thresholds)?;
    let classifier = VarianceClassifier::new(thresholds);
    info!(
        significantly_over = %thresholds.significantly_over(),
        slightly_over = %thresholds.slightly_over(),
        slightly_under = %thresholds.slightly_under(),
        significantly_under = %thresholds.significantly_under(),
        "Classifier configured"
    );

    let records = SampleGenerator::new(config.sample)?.generate();
    info!(
        records = records.len(),
        seed = config.sample.seed,
        "Generated sample spending records"
    );

    let results = classifier.evaluate_batch(&records)?;
    for result in results.iter().filter(|r| r.needs_attention) {
        debug!(
            period = %result.period,
            cost_center = %result.cost_center,
            variance_pct = %result.variance_pct,
            category = %result.category,
            "Record needs attention"
        );
    }

    let summary = VarianceSummary::from_results(&results)?;
    info!(
        records = summary.records,
        flagged = summary.flagged,
        variance_pct = %summary.variance_pct,
        "Variance analysis complete"
    );

    let report = Report::new(&thresholds, &results, &summary, config.report.flagged_only);
    let stdout = std::io::stdout();
    report::render(&mut stdout.lock(), &config.report, &report)
}
