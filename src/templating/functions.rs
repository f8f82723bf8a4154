//! Template functions for reading properties and links.
//!
//! | Function | Returns |
//! |----------|---------|
//! | `p(name=..., default=...)` | Resolved property, else `default`, else error |
//! | `has_p(name=...)` | Whether the property resolves to a value |
//! | `link(name=...)` | The consumed link as an object |
//! | `has_link(name=...)` | Whether the link was supplied |
//! | `link_p(link=..., name=..., default=...)` | Property exposed by a link |
//!
//! `name` for `p` may also be a list of names; the first that resolves wins.
//!
//! The process environment, clock and random sources are shadowed so a render is
//! a pure function of its inputs.

use std::collections::HashMap;
use std::sync::Arc;
use tera::{Tera, Value};

use super::error::to_tera_error;
use crate::core::RenderError;
use crate::links::ResolvedLinks;
use crate::properties::ResolvedProperties;

type Args = HashMap<String, Value>;

/// Register every function against `tera`.
pub fn register_functions(
    tera: &mut Tera,
    properties: Arc<ResolvedProperties>,
    links: Arc<ResolvedLinks>,
) {
    tera.register_function("p", p_function(Arc::clone(&properties)));
    tera.register_function("has_p", has_p_function(properties));
    tera.register_function("link", link_function(Arc::clone(&links)));
    tera.register_function("has_link", has_link_function(Arc::clone(&links)));
    tera.register_function("link_p", link_p_function(links));

    for name in ["get_env", "now", "get_random"] {
        tera.register_function(name, disabled_function(name));
    }
}

fn p_function(properties: Arc<ResolvedProperties>) -> impl tera::Function + 'static {
    move |args: &Args| -> tera::Result<Value> {
        let names = name_list(args, "p")?;
        let mut first_error = None;

        for name in &names {
            match properties.get(name) {
                Ok(value) => return Ok(value.clone()),
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }

        if let Some(default) = args.get("default") {
            return Ok(default.clone());
        }
        Err(to_tera_error(first_error.unwrap_or_else(|| RenderError::Other {
            message: "p() needs at least one property name".to_string(),
        })))
    }
}

fn has_p_function(properties: Arc<ResolvedProperties>) -> impl tera::Function + 'static {
    move |args: &Args| -> tera::Result<Value> {
        let name = string_arg(args, "has_p", "name")?;
        Ok(Value::Bool(properties.has(name)))
    }
}

fn link_function(links: Arc<ResolvedLinks>) -> impl tera::Function + 'static {
    move |args: &Args| -> tera::Result<Value> {
        let name = string_arg(args, "link", "name")?;
        let link = links.get(name).map_err(to_tera_error)?;
        Ok(link.to_template_value())
    }
}

fn has_link_function(links: Arc<ResolvedLinks>) -> impl tera::Function + 'static {
    move |args: &Args| -> tera::Result<Value> {
        let name = string_arg(args, "has_link", "name")?;
        Ok(Value::Bool(links.contains(name)))
    }
}

fn link_p_function(links: Arc<ResolvedLinks>) -> impl tera::Function + 'static {
    move |args: &Args| -> tera::Result<Value> {
        let link_name = string_arg(args, "link_p", "link")?;
        let name = string_arg(args, "link_p", "name")?;
        let link = links.get(link_name).map_err(to_tera_error)?;

        match (link.property(name), args.get("default")) {
            (Some(value), _) if !value.is_null() => Ok(value.clone()),
            (_, Some(default)) => Ok(default.clone()),
            _ => Err(to_tera_error(RenderError::MissingLinkProperty {
                link: link_name.to_string(),
                name: name.to_string(),
            })),
        }
    }
}

fn disabled_function(name: &'static str) -> impl tera::Function + 'static {
    move |_: &Args| -> tera::Result<Value> {
        Err(tera::Error::msg(format!("{name}() is not available in job templates")))
    }
}

fn string_arg<'a>(args: &'a Args, function: &str, key: &str) -> tera::Result<&'a str> {
    match args.get(key) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(tera::Error::msg(format!(
            "{function}() expects `{key}` to be a string, got {other}"
        ))),
        None => Err(tera::Error::msg(format!("{function}() requires a `{key}` argument"))),
    }
}

/// `name` as a single string or a list of strings.
fn name_list(args: &Args, function: &str) -> tera::Result<Vec<String>> {
    match args.get("name") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(tera::Error::msg(format!(
                    "{function}() expects every name to be a string, got {other}"
                ))),
            })
            .collect(),
        _ => string_arg(args, function, "name").map(|s| vec![s.to_string()]),
    }
}
