//! Common utilities shared by the Hypothesis Lab services.
//!
//! This crate provides:
//! - Configuration management
//! - Telemetry and structured logging

pub mod config;
pub mod telemetry;

// Re-export commonly used types
pub use config::{
    AppConfig, DatabaseConfig, EngineSettings, ServerConfig, StorageConfig, TelemetryConfig,
};
pub use telemetry::{init_from_config, init_tracing};

/// Common error type used throughout the crate
pub type Result<T> = std::result::Result<T, anyhow::Error>;
