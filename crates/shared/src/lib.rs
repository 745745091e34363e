//! Shared types, errors, and configuration for Varwatch.
//!
//! This crate provides common types used across all other crates:
//! - The closed cost center catalogue
//! - Monthly reporting periods on a July-June fiscal year
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
