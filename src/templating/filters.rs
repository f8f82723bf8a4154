//! Custom Tera filters for job templates.
//!
//! # `env_value`
//!
//! Renders any value as a double-quoted YAML scalar so it can sit on the right
//! hand side of an `env:` entry in `bpm.yml` without further quoting:
//!
//! ```text
//! env:
//!   COMMON_NAME: {{ p(name="tls.cn") | env_value }}
//!   CERTS: {{ p(name="aggregate_drain_certificates") | env_value }}
//! ```
//!
//! Strings keep their exact content, including newlines, quotes and colons.
//! Numbers and booleans become their text form (`8888`, `false`). Sequences and
//! mappings are serialized as compact JSON first, so a list default of `[]`
//! arrives in the environment as the two characters `[]`. Null becomes the empty
//! string.

use std::collections::HashMap;
use std::fmt::Write as _;
use tera::Value;

/// Name the filter is registered under.
pub const ENV_VALUE_FILTER: &str = "env_value";

/// Filter function for [`ENV_VALUE_FILTER`].
pub fn env_value_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = env_string(value)
        .map_err(|e| tera::Error::chain("env_value could not serialize value", e))?;
    Ok(Value::String(yaml_double_quote(&text)))
}

/// The string an environment variable should receive for `value`.
pub fn env_string(value: &Value) -> Result<String, serde_json::Error> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value),
    }
}

/// Quote `s` as a YAML double-quoted scalar that parses back to exactly `s`.
pub fn yaml_double_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if needs_unicode_escape(c) => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Characters YAML either forbids in a scalar or treats as line breaks / BOM.
fn needs_unicode_escape(c: char) -> bool {
    matches!(c as u32, 0x00..=0x1F | 0x7F..=0x9F | 0x2028 | 0x2029 | 0xFEFF)
}
