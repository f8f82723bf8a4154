//! Generic configuration parsing utilities.
//!
//! TOML parsing with the file path attached to every error:
//!
//! ```text
//! Failed to parse config file: /home/me/.config/release-templates/config.toml
//! Caused by:
//!     invalid type: string "yes", expected a boolean
//! ```

use anyhow::{Context, Result};
use std::path::Path;

/// Read and parse a TOML file into `T`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML for `T`.
pub async fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml(&content, path)
}

/// Parse TOML text; `origin` is only used in the error message.
pub fn parse_toml<T>(content: &str, origin: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    toml::from_str(content)
        .with_context(|| format!("Failed to parse config file: {}", origin.display()))
}
