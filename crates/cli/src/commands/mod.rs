//! CLI commands

pub mod analysis;
pub mod local;

use crate::client::ApiClient;
use crate::config::Config;
use crate::output::Render;
use anyhow::Result;

/// Context passed to all commands
pub struct CommandContext {
    pub config: Config,
    pub client: ApiClient,
}

impl CommandContext {
    /// Create a new command context
    pub fn new(config: Config) -> Result<Self> {
        let client = ApiClient::from_config(&config)?;
        Ok(Self { config, client })
    }

    /// Print `value` in the configured output format
    pub fn emit<T: Render>(&self, value: &T) -> Result<()> {
        println!("{}", value.render(self.config.output_format)?);
        Ok(())
    }
}

/// Optional statistic for display
pub(crate) fn fmt_number(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 && v.abs() < 1e-4 => format!("{v:.3e}"),
        Some(v) => format!("{v:.4}"),
        None => "-".to_string(),
    }
}
