//! The instance a template is rendered for, exposed to templates as `spec`.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::constants::instance as defaults;
use crate::core::RenderError;

/// Description of the VM instance being rendered for.
///
/// Every field has a default so tests and the CLI only need to set what a template
/// actually reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceSpec {
    pub name: String,
    pub id: String,
    pub index: u64,
    pub az: String,
    pub address: String,
    pub ip: String,
    pub deployment: String,
    pub bootstrap: bool,
}

impl Default for InstanceSpec {
    fn default() -> Self {
        Self {
            name: defaults::NAME.to_string(),
            id: defaults::ID.to_string(),
            index: 0,
            az: defaults::AZ.to_string(),
            address: defaults::ADDRESS.to_string(),
            ip: defaults::IP.to_string(),
            deployment: defaults::DEPLOYMENT.to_string(),
            bootstrap: true,
        }
    }
}

impl InstanceSpec {
    /// Parse a YAML mapping; missing fields keep their defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, RenderError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| RenderError::InvalidInstance {
            reason: e.to_string(),
        })
    }

    /// The `spec` object handed to templates, including `job.name`.
    pub fn to_template_value(&self, job_name: &str) -> Value {
        json!({
            "name": self.name,
            "id": self.id,
            "index": self.index,
            "az": self.az,
            "address": self.address,
            "ip": self.ip,
            "deployment": self.deployment,
            "bootstrap": self.bootstrap,
            "job": { "name": job_name },
        })
    }
}
