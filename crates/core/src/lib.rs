//! Core variance logic for Varwatch.
//!
//! This crate contains pure business logic with ZERO I/O dependencies.
//! Spending records go in, classified variance results come out.
//!
//! # Modules
//!
//! - `variance` - Variance metrics, threshold classification, and summaries

pub mod variance;
