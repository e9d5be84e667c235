//! Hypothesis Lab CLI
//!
//! Run hypothesis tests on local CSV files or against a Hypothesis Lab server.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use hypothesis_lab_cli::commands::{analysis, local, CommandContext};
use hypothesis_lab_cli::config::Config;
use hypothesis_lab_cli::output::{colors, OutputFormat};

/// Output format for CLI commands
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum CliOutputFormat {
    /// JSON output
    Json,
    /// Table output
    Table,
    /// Plain text output
    Plain,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Table => OutputFormat::Table,
            CliOutputFormat::Plain => OutputFormat::Plain,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "hypothesis-lab")]
#[command(author, version, about = "Hypothesis Lab CLI")]
#[command(long_about = "Command-line interface for Hypothesis Lab.\n\n\
    Run t-test, ANOVA, chi-square, Mann-Whitney U, Wilcoxon and Kruskal-Wallis tests \
    on group/value CSV files, locally or through a Hypothesis Lab server.")]
#[command(propagate_version = true)]
struct Cli {
    /// Output format (overrides config)
    #[arg(short = 'o', long, global = true, value_enum)]
    format: Option<CliOutputFormat>,

    /// API endpoint URL (overrides config)
    #[arg(long, global = true, env = "HYPOTHESIS_LAB_API_URL")]
    api_url: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a test on a local CSV file
    #[command(alias = "r")]
    Run {
        /// CSV file with `group` and `value` columns
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,

        /// Test to run; prompts when omitted
        #[arg(short, long)]
        test: Option<String>,

        /// Confidence level in (0, 1)
        #[arg(short, long)]
        confidence: Option<f64>,
    },

    /// Run every test on a local CSV file
    Compare {
        /// CSV file with `group` and `value` columns
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,

        /// Confidence level in (0, 1)
        #[arg(short, long)]
        confidence: Option<f64>,
    },

    /// List the supported tests
    Kinds,

    /// Upload a CSV file to the server and run a test on it
    #[command(alias = "u")]
    Upload {
        /// CSV file with `group` and `value` columns
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,

        /// Test to run
        #[arg(short, long)]
        test: String,

        /// Confidence level in (0, 1)
        #[arg(short, long)]
        confidence: Option<f64>,
    },

    /// List analyses stored on the server, newest first
    #[command(alias = "h")]
    History {
        /// Maximum number of analyses to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Re-run a stored analysis against its original CSV
    Rerun {
        /// Analysis ID
        #[arg(value_name = "ID")]
        id: i64,
    },

    /// Delete a stored analysis and its CSV
    Delete {
        /// Analysis ID
        #[arg(value_name = "ID")]
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show server health
    Status,

    /// Show or change CLI configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Reset configuration to defaults
    Reset,
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "hypothesis-lab", &mut std::io::stdout());
}

fn handle_config(config: &mut Config, command: Option<ConfigCommands>) -> Result<()> {
    match command.unwrap_or(ConfigCommands::Show) {
        ConfigCommands::Show => {
            println!("{}", toml::to_string_pretty(config)?);
            println!(
                "{}",
                colors::dim(&format!("Config file: {}", Config::config_file()?.display()))
            );
        }
        ConfigCommands::Set { key, value } => {
            config.set(&key, &value)?;
            println!("{}", colors::success(&format!("Set {key} = {value}")));
        }
        ConfigCommands::Get { key } => match config.get(&key) {
            Some(value) => println!("{value}"),
            None => anyhow::bail!("Unknown configuration key: {}", key),
        },
        ConfigCommands::Reset => {
            config.reset()?;
            println!("{}", colors::success("Configuration reset to defaults"));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load()?;
    if !config.colored {
        colored::control::set_override(false);
    }

    let command = match cli.command {
        Commands::Completions { shell } => {
            generate_completions(shell);
            return Ok(());
        }
        Commands::Config { command } => return handle_config(&mut config, command),
        command => command,
    };

    if let Some(api_url) = cli.api_url {
        config.api_endpoint = api_url;
    }
    if let Some(format) = cli.format {
        config.output_format = format.into();
    }

    let ctx = CommandContext::new(config)?;

    let result = match command {
        Commands::Run {
            file,
            test,
            confidence,
        } => local::run(&ctx, file, test, confidence).await,
        Commands::Compare { file, confidence } => local::compare(&ctx, file, confidence).await,
        Commands::Kinds => local::kinds(&ctx).await,
        Commands::Upload {
            file,
            test,
            confidence,
        } => analysis::upload(&ctx, file, test, confidence).await,
        Commands::History { limit } => analysis::history(&ctx, limit).await,
        Commands::Rerun { id } => analysis::rerun(&ctx, id).await,
        Commands::Delete { id, yes } => analysis::delete(&ctx, id, yes).await,
        Commands::Status => analysis::status(&ctx).await,
        Commands::Config { .. } | Commands::Completions { .. } => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", colors::error("Error:"), e);
        std::process::exit(1);
    }

    Ok(())
}
