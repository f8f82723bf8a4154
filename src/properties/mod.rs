//! Property trees and their resolution against a job spec.
//!
//! Operators supply properties as a nested mapping (usually a YAML file). A job's
//! spec declares the dotted names it accepts, each with an optional default. At
//! render time a template may only read declared names; the value is the supplied
//! one when present, otherwise the spec default.
//!
//! ```rust
//! use release_templates::properties::Properties;
//! use serde_json::json;
//!
//! let props = Properties::from_value(json!({
//!     "api": { "tls": { "cn": "CN" } },
//!     "external_port": 8888,
//! })).unwrap();
//!
//! assert_eq!(props.lookup("api.tls.cn"), Some(&json!("CN")));
//! assert_eq!(props.lookup("api.tls.missing"), None);
//! ```

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

use crate::core::{RenderError, find_similar};
use crate::job::JobSpec;

/// A property tree supplied by the operator. The root is always a mapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Properties {
    root: Map<String, Value>,
}

impl Properties {
    /// An empty property tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value; anything other than an object (or null, treated as empty) is rejected.
    pub fn from_value(value: Value) -> Result<Self, RenderError> {
        match value {
            Value::Object(root) => Ok(Self {
                root,
            }),
            Value::Null => Ok(Self::new()),
            other => Err(RenderError::InvalidProperties {
                reason: format!("expected a mapping at the top level, found {}", kind_of(&other)),
            }),
        }
    }

    /// Parse a YAML (or JSON, which is a YAML subset) document.
    pub fn from_yaml_str(content: &str) -> Result<Self, RenderError> {
        let value: Value = serde_yaml::from_str(content).map_err(|e| {
            RenderError::InvalidProperties {
                reason: e.to_string(),
            }
        })?;
        Self::from_value(value)
    }

    /// Read and parse a YAML/JSON properties file.
    pub async fn from_yaml_file(path: &Path) -> Result<Self, RenderError> {
        let content =
            tokio::fs::read_to_string(path).await.map_err(|e| RenderError::io(path, &e))?;
        Self::from_yaml_str(&content)
    }

    /// Look up a dotted path. See [`lookup_path`].
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        lookup_in_map(&self.root, &split_path(path))
    }

    /// The raw tree as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

impl TryFrom<Value> for Properties {
    type Error = RenderError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

/// Look up a dotted path in a JSON value.
///
/// Segments walk nested mappings. A key that itself contains dots is matched too,
/// longest key first, so both `{"api": {"tls": {"cn": 1}}}` and
/// `{"api.tls": {"cn": 1}}` answer `api.tls.cn`.
pub fn lookup_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    match root {
        Value::Object(map) => lookup_in_map(map, &split_path(path)),
        _ => None,
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('.').collect()
}

fn lookup_in_map<'a>(map: &'a Map<String, Value>, segments: &[&str]) -> Option<&'a Value> {
    if segments.is_empty() {
        return None;
    }

    for take in (1..=segments.len()).rev() {
        let key = segments[..take].join(".");
        let Some(value) = map.get(&key) else {
            continue;
        };

        if take == segments.len() {
            return Some(value);
        }
        if let Value::Object(child) = value {
            if let Some(found) = lookup_in_map(child, &segments[take..]) {
                return Some(found);
            }
        }
    }

    None
}

/// Properties resolved for a single job: every declared name mapped to its
/// supplied value, its spec default, or nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProperties {
    values: BTreeMap<String, Option<Value>>,
}

impl ResolvedProperties {
    /// Resolve `supplied` against the declarations in `spec`.
    ///
    /// Supplied properties the spec does not declare are not visible to templates.
    pub fn resolve(spec: &JobSpec, supplied: &Properties) -> Self {
        let values = spec
            .properties
            .iter()
            .map(|(name, definition)| {
                let value = supplied
                    .lookup(name)
                    .filter(|v| !v.is_null())
                    .cloned()
                    .or_else(|| definition.default.clone());
                (name.clone(), value)
            })
            .collect::<BTreeMap<_, _>>();

        let unresolved = values.values().filter(|v| v.is_none()).count();
        tracing::debug!(
            "Resolved {} properties for job '{}' ({} without value)",
            values.len(),
            spec.name,
            unresolved
        );

        Self {
            values,
        }
    }

    /// Value for a declared property.
    ///
    /// # Errors
    ///
    /// [`RenderError::MissingProperty`] if the name is not declared (with suggestions)
    /// or if it has neither a supplied value nor a default.
    pub fn get(&self, name: &str) -> Result<&Value, RenderError> {
        match self.values.get(name) {
            Some(Some(value)) => Ok(value),
            Some(None) => Err(RenderError::missing_property(name)),
            None => Err(RenderError::MissingProperty {
                name: name.to_string(),
                suggestions: self.suggest(name),
            }),
        }
    }

    /// Whether `name` is declared and has a value.
    pub fn has(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(Some(_)))
    }

    /// Declared property names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Declared names closest to `target`, best first, at most three.
    fn suggest(&self, target: &str) -> Vec<String> {
        find_similar(target, self.values.keys())
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
