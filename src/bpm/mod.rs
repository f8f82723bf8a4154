//! The rendered `bpm.yml` process-manager document.
//!
//! Rendering `config/bpm.yml` produces YAML text; this module parses it back into a
//! typed [`BpmConfig`] so callers (and tests) can inspect a process's environment
//! without string matching:
//!
//! ```rust
//! use release_templates::bpm::{BpmConfig, bpm_process};
//!
//! let doc = r#"
//! processes:
//!   - name: cache
//!     executable: /var/vcap/packages/cache/bin/cache
//!     env:
//!       CACHE_PORT: 8888
//!       AGGREGATE_DRAIN_CERTIFICATES: "[]"
//! "#;
//!
//! let config = BpmConfig::from_yaml(doc).unwrap();
//! let process = bpm_process(&config, 0).unwrap();
//! assert_eq!(process.env["CACHE_PORT"], "8888");
//! assert_eq!(process.env["AGGREGATE_DRAIN_CERTIFICATES"], "[]");
//! ```
//!
//! Environment values are always strings. Unquoted scalars in the document
//! (`8888`, `true`) are read as their text form; sequences or mappings under
//! `env` are rejected.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::RenderError;

/// A parsed `bpm.yml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BpmConfig {
    #[serde(default)]
    pub processes: Vec<BpmProcess>,
}

/// One supervised process.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BpmProcess {
    pub name: String,

    #[serde(default)]
    pub executable: String,

    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default, deserialize_with = "deserialize_env")]
    pub env: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<BpmLimits>,

    #[serde(default)]
    pub ephemeral_disk: bool,

    #[serde(default)]
    pub persistent_disk: bool,

    #[serde(default)]
    pub additional_volumes: Vec<BpmVolume>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hooks: Option<BpmHooks>,

    #[serde(default)]
    pub capabilities: Vec<String>,
}

/// Resource limits. Memory is kept as written (`1G`, `512M`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BpmLimits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_files: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BpmVolume {
    pub path: String,
    #[serde(default)]
    pub writable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BpmHooks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_start: Option<String>,
}

impl BpmConfig {
    /// Parse rendered YAML.
    ///
    /// # Errors
    ///
    /// [`RenderError::InvalidDocument`] if the text is not YAML of this shape.
    pub fn from_yaml(content: &str) -> Result<Self, RenderError> {
        serde_yaml::from_str(content).map_err(|e| RenderError::InvalidDocument {
            reason: e.to_string(),
        })
    }

    pub fn process(&self, index: usize) -> Option<&BpmProcess> {
        self.processes.get(index)
    }

    pub fn process_named(&self, name: &str) -> Option<&BpmProcess> {
        self.processes.iter().find(|p| p.name == name)
    }
}

/// The process at `index`, or [`RenderError::ProcessNotFound`].
pub fn bpm_process(config: &BpmConfig, index: usize) -> Result<&BpmProcess, RenderError> {
    config.process(index).ok_or(RenderError::ProcessNotFound {
        index,
        count: config.processes.len(),
    })
}

fn deserialize_env<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_yaml::Value>> = Option::deserialize(deserializer)?;
    let mut env = BTreeMap::new();

    for (key, value) in raw.unwrap_or_default() {
        let text = match value {
            serde_yaml::Value::String(s) => s,
            serde_yaml::Value::Number(n) => n.to_string(),
            serde_yaml::Value::Bool(b) => b.to_string(),
            serde_yaml::Value::Null => String::new(),
            _ => {
                return Err(de::Error::custom(format!(
                    "env var '{key}' must be a scalar, found a sequence or mapping"
                )));
            }
        };
        env.insert(key, text);
    }

    Ok(env)
}
