//! CLI configuration management
//!
//! Handles loading and saving configuration from ~/.hypothesis-lab/config.toml

use crate::output::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API endpoint URL
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,

    /// Default output format
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Enable colored output
    #[serde(default = "default_colored")]
    pub colored: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Confidence level used when a command gives none
    #[serde(default = "default_confidence")]
    pub default_confidence: f64,
}

fn default_api_endpoint() -> String {
    "http://localhost:8000".to_string()
}

fn default_colored() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}

fn default_confidence() -> f64 {
    0.95
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_endpoint: default_api_endpoint(),
            output_format: OutputFormat::default(),
            colored: default_colored(),
            timeout_seconds: default_timeout(),
            default_confidence: default_confidence(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".hypothesis-lab"))
    }

    /// Get the config file path
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from_file()?;

        if let Ok(api_url) = std::env::var("HYPOTHESIS_LAB_API_URL") {
            config.api_endpoint = api_url;
        }
        if let Ok(format) = std::env::var("HYPOTHESIS_LAB_OUTPUT_FORMAT") {
            config.output_format = OutputFormat::parse(&format).unwrap_or_default();
        }
        if std::env::var("NO_COLOR").is_ok() {
            config.colored = false;
        }

        Ok(config)
    }

    /// Load configuration from file only
    fn load_from_file() -> Result<Self> {
        let config_file = Self::config_file()?;

        if !config_file.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_file).context("Failed to read config file")?;
        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir()?;
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(Self::config_file()?, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "api_endpoint" | "api-endpoint" | "api_url" => Some(self.api_endpoint.clone()),
            "output_format" | "output-format" | "format" => Some(self.output_format.to_string()),
            "colored" | "color" => Some(self.colored.to_string()),
            "timeout" | "timeout_seconds" => Some(self.timeout_seconds.to_string()),
            "confidence" | "default_confidence" => Some(self.default_confidence.to_string()),
            _ => None,
        }
    }

    /// Update a configuration value by key without saving
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_endpoint" | "api-endpoint" | "api_url" => {
                self.api_endpoint = value.to_string();
            }
            "output_format" | "output-format" | "format" => {
                self.output_format = OutputFormat::parse(value).with_context(|| {
                    format!("Invalid output format: {value}. Use json, table, or plain")
                })?;
            }
            "colored" | "color" => {
                self.colored = value.parse().context("Invalid boolean value")?;
            }
            "timeout" | "timeout_seconds" => {
                self.timeout_seconds = value.parse().context("Invalid timeout value")?;
            }
            "confidence" | "default_confidence" => {
                let confidence: f64 = value.parse().context("Invalid confidence level")?;
                if !(confidence > 0.0 && confidence < 1.0) {
                    anyhow::bail!("Confidence level must be strictly between 0 and 1");
                }
                self.default_confidence = confidence;
            }
            _ => anyhow::bail!("Unknown configuration key: {}", key),
        }
        Ok(())
    }

    /// Set a configuration value by key and save
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Reset configuration to defaults
    pub fn reset(&mut self) -> Result<()> {
        *self = Self::default();
        self.save()
    }
}
