//! Configuration management for the application.
//!
//! Settings are layered from configuration files and environment variables.
//! Every section has defaults, so the service starts with no files present.
//!
//! ## Example Configuration
//!
//! ```toml
//! [server]
//! port = 8000
//!
//! [database]
//! url = "sqlite://hypothesis.db?mode=rwc"
//!
//! [storage]
//! upload_dir = "uploads"
//!
//! [engine]
//! default_confidence = 0.95
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub engine: EngineSettings,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (e.g., "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Largest accepted upload body in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Connection pool size
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_db_timeout")]
    pub timeout_seconds: u64,
}

/// Dataset storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory where uploaded CSV files are kept
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Service name for tracing
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Enable JSON logging format
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Statistics engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Confidence level used when a caller supplies none
    #[serde(default = "default_confidence")]
    pub default_confidence: f64,

    /// Largest smaller-sample size for the exact Mann-Whitney distribution
    #[serde(default = "default_mann_whitney_exact_max")]
    pub mann_whitney_exact_max: usize,

    /// Largest number of pairs for the exact Wilcoxon distribution
    #[serde(default = "default_wilcoxon_exact_max")]
    pub wilcoxon_exact_max: usize,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_database_url() -> String {
    "sqlite://hypothesis.db?mode=rwc".to_string()
}

fn default_pool_size() -> u32 {
    5
}

fn default_db_timeout() -> u64 {
    30
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_service_name() -> String {
    "hypothesis-lab".to_string()
}

fn default_json_logging() -> bool {
    false
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_confidence() -> f64 {
    0.95
}

fn default_mann_whitney_exact_max() -> usize {
    8
}

fn default_wilcoxon_exact_max() -> usize {
    50
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            pool_size: default_pool_size(),
            timeout_seconds: default_db_timeout(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            json_logging: default_json_logging(),
            log_level: default_log_level(),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_confidence: default_confidence(),
            mann_whitney_exact_max: default_mann_whitney_exact_max(),
            wilcoxon_exact_max: default_wilcoxon_exact_max(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and configuration files.
    ///
    /// The configuration is loaded in the following order (later sources override earlier ones):
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/{environment}.toml (if exists, where environment is from APP_ENV)
    /// 4. Environment variables (prefixed with APP_)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use hypothesis_lab_common::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load configuration");
    /// println!("Server will run on {}:{}", config.server.host, config.server.port);
    /// ```
    pub fn load() -> Result<Self> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            // Example: APP_SERVER__PORT=3000
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.server.request_timeout_seconds == 0 {
            anyhow::bail!("Request timeout must be greater than 0");
        }

        if self.database.url.is_empty() {
            anyhow::bail!("Database URL is required");
        }

        if self.database.pool_size == 0 {
            anyhow::bail!("Database pool size must be greater than 0");
        }

        if self.database.timeout_seconds == 0 {
            anyhow::bail!("Database timeout must be greater than 0");
        }

        if self.storage.upload_dir.as_os_str().is_empty() {
            anyhow::bail!("Upload directory is required");
        }

        let confidence = self.engine.default_confidence;
        if !(confidence > 0.0 && confidence < 1.0) {
            anyhow::bail!(
                "Default confidence must be strictly between 0 and 1, got {}",
                confidence
            );
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.telemetry.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log level '{}'. Must be one of: {}",
                self.telemetry.log_level,
                valid_log_levels.join(", ")
            );
        }

        Ok(())
    }

    /// Get the database connection timeout as a Duration
    pub fn database_timeout(&self) -> Duration {
        Duration::from_secs(self.database.timeout_seconds)
    }

    /// Get the per-request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_seconds)
    }

    /// Create a development configuration with sensible defaults
    pub fn development() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                ..ServerConfig::default()
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                pool_size: 1,
                timeout_seconds: 5,
            },
            storage: StorageConfig {
                upload_dir: std::env::temp_dir().join("hypothesis-lab-dev"),
            },
            telemetry: TelemetryConfig {
                service_name: "hypothesis-lab-dev".to_string(),
                json_logging: false,
                log_level: "debug".to_string(),
            },
            engine: EngineSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.storage.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.engine.mann_whitney_exact_max, 8);
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::development();
        assert!(config.validate().is_ok());

        config.server.port = 0;
        assert!(config.validate().is_err());
        config.server.port = 8000;

        config.database.pool_size = 0;
        assert!(config.validate().is_err());
        config.database.pool_size = 1;

        config.engine.default_confidence = 1.0;
        assert!(config.validate().is_err());
        config.engine.default_confidence = 0.99;

        config.telemetry.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[server]\nport = 9100\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.pool_size, 5);
    }
}
