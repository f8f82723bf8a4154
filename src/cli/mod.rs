//! Command-line interface for release-templates.
//!
//! # Commands
//!
//! - `render` - Render one template of a job (default `config/bpm.yml`)
//! - `validate` - Render every template of a job and check `bpm.yml` parses
//! - `jobs` - List the jobs of a release
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - Debug logging on stderr
//! - `--quiet` / `-q` - Errors only
//! - `--config` / `-c` - Tool configuration file (see [`crate::config`])
//!
//! `RUST_LOG` takes precedence over both logging flags.
//!
//! # Example
//!
//! ```bash
//! release-templates render --release release --job loggr-syslog-binding-cache \
//!     --properties props.yml --links links.yml
//! ```

pub mod common;
mod jobs;
mod render;
pub mod validate;


use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::ToolConfig;

/// Settings derived from global flags, applied before a command runs.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter directive (`debug`, `info`, `error`)
    pub log_level: Option<String>,
    /// Explicit configuration file
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// `RUST_LOG` wins over the configured level. Calling this more than once is
    /// harmless; later calls are ignored.
    pub fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(self.log_level.as_deref().unwrap_or("info"))
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "release-templates",
    about = "Render and validate job templates of a release",
    version,
    long_about = "Renders the templates of a release's jobs (bpm.yml, certificates, config files) \
                  from a properties file, consumed links and an instance spec."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render one template of a job
    Render(render::RenderCommand),

    /// Render every template of a job and report failures
    Validate(validate::ValidateCommand),

    /// List the jobs in a release
    Jobs(jobs::JobsCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();
        let tool_config = ToolConfig::load(config.config_path.as_deref()).await?;

        match self.command {
            Commands::Render(cmd) => cmd.execute(&tool_config).await,
            Commands::Validate(cmd) => cmd.execute(&tool_config).await,
            Commands::Jobs(cmd) => cmd.execute(&tool_config).await,
        }
    }
}
