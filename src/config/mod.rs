//! Tool configuration.
//!
//! An optional TOML file supplies defaults for the CLI:
//!
//! ```toml
//! # Release used when --release is not given
//! release_dir = "/home/me/workspace/loggregator-agent-release"
//!
//! # Fail when a links file supplies links the job does not consume
//! strict_links = true
//!
//! # Instance exposed to templates as `spec`; unset fields keep their defaults
//! [instance]
//! name = "log-cache"
//! index = 2
//! az = "z3"
//! ```
//!
//! # Location
//!
//! The first of these is used:
//! 1. `--config <FILE>`
//! 2. the file named by `RELEASE_TEMPLATES_CONFIG`
//! 3. `<config dir>/release-templates/config.toml` (`~/.config` on Linux,
//!    `~/Library/Application Support` on macOS, `%APPDATA%` on Windows)
//!
//! Files named explicitly must exist. A missing default file means an empty
//! configuration.

pub mod parser;

pub use parser::{parse_config, parse_toml};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_DIR_NAME, CONFIG_ENV_VAR, CONFIG_FILE_NAME};
use crate::job::InstanceSpec;
use crate::templating::RenderOptions;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    /// Release directory used when the CLI is not given `--release`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_dir: Option<PathBuf>,

    /// Reject supplied links the job does not consume.
    #[serde(default)]
    pub strict_links: bool,

    /// Instance spec overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<InstanceSpec>,
}

impl ToolConfig {
    /// Load from `explicit`, the environment, or the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file cannot be read, or if the
    /// chosen file is not valid TOML.
    pub async fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::debug!("Loading config from --config {}", path.display());
            return Self::load_from(path).await;
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|p| !p.is_empty()) {
            let path = PathBuf::from(path);
            tracing::debug!("Loading config from {}={}", CONFIG_ENV_VAR, path.display());
            return Self::load_from(&path).await;
        }

        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!("Loading config from {}", path.display());
                Self::load_from(&path).await
            }
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub async fn load_from(path: &Path) -> Result<Self> {
        parse_config(path).await
    }

    /// `<config dir>/release-templates/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Render options derived from this configuration.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            instance: self.instance.clone().unwrap_or_default(),
            strict_links: self.strict_links,
        }
    }
}
