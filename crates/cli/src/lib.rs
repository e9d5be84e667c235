//! Hypothesis Lab CLI Library
//!
//! Runs hypothesis tests on local CSV files and drives a running
//! Hypothesis Lab API: upload, history, re-run and delete.

pub mod client;
pub mod commands;
pub mod config;
pub mod interactive;
pub mod output;

pub use client::ApiClient;
pub use config::Config;
pub use output::{JsonFormatter, OutputFormat, PlainFormatter, TableFormatter};

/// Re-export common types
pub use anyhow::{Context, Result};
