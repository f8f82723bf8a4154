//! The job `spec` file.
//!
//! ```yaml
//! name: loggr-syslog-binding-cache
//! templates:
//!   bpm.yml.tera: config/bpm.yml
//! consumes:
//!   - name: cloud_controller
//!     type: cloud_controller
//! properties:
//!   external_port:
//!     description: "Port the binding cache serves bindings on"
//!     default: 9000
//! ```

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

use crate::core::RenderError;

/// Parsed contents of `jobs/<name>/spec`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Templates in declaration order: source file under `templates/` to destination.
    #[serde(default, deserialize_with = "deserialize_templates")]
    pub templates: Vec<TemplateEntry>,

    #[serde(default)]
    pub packages: Vec<String>,

    #[serde(default)]
    pub consumes: Vec<LinkConsumption>,

    #[serde(default)]
    pub provides: Vec<LinkProvision>,

    /// Declared properties keyed by dotted name.
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEntry {
    /// File name under the job's `templates/` directory
    pub source: String,
    /// Path the rendered file is written to, relative to the job directory on the VM
    pub destination: String,
}

/// One entry of `consumes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConsumption {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

/// One entry of `provides`. Kept for listing; rendering never reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkProvision {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
    #[serde(default)]
    pub properties: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertyDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `None` means the property is required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl JobSpec {
    /// Parse and validate a spec document. `file` is only used in error messages.
    pub fn from_yaml_str(content: &str, file: &str) -> Result<Self, RenderError> {
        let spec: Self =
            serde_yaml::from_str(content).map_err(|e| RenderError::InvalidJobSpec {
                file: file.to_string(),
                reason: e.to_string(),
            })?;
        spec.validate(file)?;
        Ok(spec)
    }

    fn validate(&self, file: &str) -> Result<(), RenderError> {
        let invalid = |reason: String| RenderError::InvalidJobSpec {
            file: file.to_string(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty".to_string()));
        }

        let mut destinations = HashSet::new();
        for entry in &self.templates {
            if !destinations.insert(entry.destination.as_str()) {
                return Err(invalid(format!(
                    "destination '{}' is declared more than once",
                    entry.destination
                )));
            }
        }

        let mut consumed = HashSet::new();
        for consumption in &self.consumes {
            if !consumed.insert(consumption.name.as_str()) {
                return Err(invalid(format!(
                    "link '{}' is consumed more than once",
                    consumption.name
                )));
            }
        }

        Ok(())
    }

    /// The template entry rendered to `destination`.
    pub fn template_for(&self, destination: &str) -> Option<&TemplateEntry> {
        self.templates.iter().find(|t| t.destination == destination)
    }

    /// The `consumes` entry named `name`.
    pub fn consumption(&self, name: &str) -> Option<&LinkConsumption> {
        self.consumes.iter().find(|c| c.name == name)
    }
}

/// `templates` is a YAML mapping whose order matters; a map type would lose it.
fn deserialize_templates<'de, D>(deserializer: D) -> Result<Vec<TemplateEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let mapping = Option::<serde_yaml::Mapping>::deserialize(deserializer)?.unwrap_or_default();

    mapping
        .into_iter()
        .map(|(source, destination)| {
            let source = source
                .as_str()
                .ok_or_else(|| de::Error::custom("template source must be a string"))?;
            let destination = destination.as_str().ok_or_else(|| {
                de::Error::custom(format!("destination for template '{source}' must be a string"))
            })?;
            Ok(TemplateEntry {
                source: source.to_string(),
                destination: destination.to_string(),
            })
        })
        .collect()
}
