//! Consumed links.
//!
//! A link is a named reference to another job's instances and the properties that
//! job chose to expose. A job declares the links it needs under `consumes`; every
//! non-optional declaration must be matched by a supplied link before a template
//! is evaluated.
//!
//! Links are usually supplied as a YAML sequence:
//!
//! ```yaml
//! - name: cloud_controller
//!   type: cloud_controller
//!   properties:
//!     cc:
//!       internal_service_hostname: cloud-controller-ng.service.cf.internal
//!   instances:
//!     - id: a-b-c-d
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

use crate::constants::link_instance as defaults;
use crate::core::RenderError;
use crate::job::JobSpec;
use crate::properties::lookup_path;

/// A link supplied to a render call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,

    /// Explicit link address; falls back to the first instance's address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default = "empty_object")]
    pub properties: Value,

    #[serde(default)]
    pub instances: Vec<LinkInstance>,
}

/// One instance behind a link. Only `id` is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkInstance {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub az: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootstrap: Option<bool>,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl Link {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link_type: None,
            address: None,
            properties: empty_object(),
            instances: Vec::new(),
        }
    }

    pub fn with_type(mut self, link_type: impl Into<String>) -> Self {
        self.link_type = Some(link_type.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_properties(mut self, properties: Value) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_instance(mut self, instance: LinkInstance) -> Self {
        self.instances.push(instance);
        self
    }

    /// Explicit address, else the first instance's (defaulted) address.
    pub fn effective_address(&self) -> Option<String> {
        self.address.clone().or_else(|| {
            self.instances.first().map(|i| {
                i.address.clone().unwrap_or_else(|| defaults::ADDRESS.to_string())
            })
        })
    }

    /// A dotted property exposed by the link.
    pub fn property(&self, name: &str) -> Option<&Value> {
        lookup_path(&self.properties, name)
    }

    /// The value handed to templates by `link(name=...)`, with instance defaults filled in.
    pub fn to_template_value(&self) -> Value {
        let instances: Vec<Value> = self
            .instances
            .iter()
            .enumerate()
            .map(|(position, instance)| {
                let index = instance.index.unwrap_or(position as u64);
                json!({
                    "id": instance.id,
                    "name": instance.name.as_deref().unwrap_or(defaults::NAME),
                    "index": index,
                    "az": instance.az.as_deref().unwrap_or(defaults::AZ),
                    "address": instance.address.as_deref().unwrap_or(defaults::ADDRESS),
                    "bootstrap": instance.bootstrap.unwrap_or(index == 0),
                })
            })
            .collect();

        json!({
            "name": self.name,
            "type": self.link_type,
            "address": self.effective_address(),
            "properties": self.properties,
            "instances": instances,
        })
    }
}

impl LinkInstance {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            index: None,
            az: None,
            address: None,
            bootstrap: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_index(mut self, index: u64) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_az(mut self, az: impl Into<String>) -> Self {
        self.az = Some(az.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_bootstrap(mut self, bootstrap: bool) -> Self {
        self.bootstrap = Some(bootstrap);
        self
    }
}

/// Parse a YAML/JSON sequence of links. An empty document is no links.
pub fn links_from_yaml_str(content: &str) -> Result<Vec<Link>, RenderError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let links: Option<Vec<Link>> =
        serde_yaml::from_str(content).map_err(|e| RenderError::InvalidLinks {
            reason: e.to_string(),
        })?;
    Ok(links.unwrap_or_default())
}

/// Links checked against a job's `consumes`, keyed by name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedLinks {
    job: String,
    links: BTreeMap<String, Link>,
}

impl ResolvedLinks {
    /// Match `supplied` against `spec.consumes`.
    ///
    /// # Errors
    ///
    /// - [`RenderError::UnsatisfiedLink`] for the first non-optional consumption, in
    ///   spec order, that has no supplied link
    /// - [`RenderError::UndeclaredLink`] for a supplied link the job does not consume,
    ///   only when `strict` is set; otherwise such links are dropped with a warning
    pub fn resolve(spec: &JobSpec, supplied: &[Link], strict: bool) -> Result<Self, RenderError> {
        let mut by_name: BTreeMap<&str, &Link> = BTreeMap::new();
        for link in supplied {
            if by_name.insert(link.name.as_str(), link).is_some() {
                tracing::warn!("Link '{}' supplied more than once, using the last one", link.name);
            }
        }

        for consumption in &spec.consumes {
            if !consumption.optional && !by_name.contains_key(consumption.name.as_str()) {
                return Err(RenderError::UnsatisfiedLink {
                    job: spec.name.clone(),
                    name: consumption.name.clone(),
                });
            }
        }

        let mut links = BTreeMap::new();
        for (name, link) in by_name {
            if spec.consumption(name).is_none() {
                if strict {
                    return Err(RenderError::UndeclaredLink {
                        job: spec.name.clone(),
                        name: name.to_string(),
                    });
                }
                tracing::warn!("Ignoring link '{}': job '{}' does not consume it", name, spec.name);
                continue;
            }
            links.insert(name.to_string(), link.clone());
        }

        tracing::debug!("Resolved {} consumed links for job '{}'", links.len(), spec.name);

        Ok(Self {
            job: spec.name.clone(),
            links,
        })
    }

    /// The link named `name`, or [`RenderError::UnsatisfiedLink`].
    pub fn get(&self, name: &str) -> Result<&Link, RenderError> {
        self.links.get(name).ok_or_else(|| RenderError::UnsatisfiedLink {
            job: self.job.clone(),
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.links.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
