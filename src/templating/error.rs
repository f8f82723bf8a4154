//! Translation of Tera errors into [`RenderError`].
//!
//! Template functions fail with a typed [`RenderError`] chained inside a
//! `tera::Error`. Tera wraps that again (function call, then render), so the
//! original is recovered by walking the source chain. Everything else becomes an
//! [`RenderError::UndefinedVariable`] or [`RenderError::TemplateSyntax`] with a
//! message stripped of Tera's internal noise.

use regex::Regex;
use std::error::Error as StdError;
use tera::Context as TeraContext;

use crate::core::{RenderError, find_similar};

/// Wrap a typed error so it survives the trip through Tera.
pub(crate) fn to_tera_error(err: RenderError) -> tera::Error {
    tera::Error::chain(err.to_string(), err)
}

/// The first [`RenderError`] in the source chain of a Tera error, if any.
pub fn find_render_error(error: &tera::Error) -> Option<RenderError> {
    let mut current: Option<&(dyn StdError + 'static)> = Some(error as &(dyn StdError + 'static));
    while let Some(err) = current {
        if let Some(render_error) = err.downcast_ref::<RenderError>() {
            return Some(render_error.clone());
        }
        current = err.source();
    }
    None
}

/// Convert a Tera error raised while parsing or rendering `template`.
pub fn from_tera_error(
    error: &tera::Error,
    template: &str,
    context: &TeraContext,
) -> RenderError {
    if let Some(render_error) = find_render_error(error) {
        return render_error;
    }

    let message = format_tera_error(error, template);

    if let Some(variable) = extract_variable_name(&message) {
        let available = available_variables(context);
        return RenderError::UndefinedVariable {
            template: template.to_string(),
            suggestions: find_similar(&variable, &available),
            variable,
        };
    }

    RenderError::TemplateSyntax {
        template: template.to_string(),
        line: extract_line(&message),
        message,
    }
}

/// Join the messages of the whole error chain, dropping the generic
/// "Failed to render/parse" wrappers.
pub fn format_tera_error(error: &tera::Error, template: &str) -> String {
    let wrappers = [
        format!("Failed to render '{template}'"),
        format!("Failed to render {template:?}"),
        format!("Failed to parse '{template}'"),
        format!("Failed to parse {template:?}"),
    ];

    let mut messages = Vec::new();
    let mut current: Option<&(dyn StdError + 'static)> = Some(error as &(dyn StdError + 'static));
    while let Some(err) = current {
        let mut cleaned = err.to_string();
        for wrapper in &wrappers {
            cleaned = cleaned.replace(wrapper.as_str(), "");
        }
        let cleaned = cleaned.trim();
        if !cleaned.is_empty() {
            messages.push(cleaned.to_string());
        }
        current = err.source();
    }

    if messages.is_empty() {
        "Template syntax error".to_string()
    } else {
        messages.join("\n  → ")
    }
}

/// Variable name from "Variable `foo` not found ..." messages.
fn extract_variable_name(message: &str) -> Option<String> {
    let re = Regex::new(r"Variable `([^`]+)` not found").ok()?;
    re.captures(message).and_then(|caps| caps.get(1)).map(|m| m.as_str().to_string())
}

/// Line from a pest-style location marker (` --> 3:7`).
fn extract_line(message: &str) -> Option<usize> {
    let re = Regex::new(r"-->\s*(\d+):(\d+)").ok()?;
    re.captures(message)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<usize>().ok())
}

/// Dotted paths of the context, two levels deep.
fn available_variables(context: &TeraContext) -> Vec<String> {
    let mut vars = Vec::new();
    if let serde_json::Value::Object(root) = context.clone().into_json() {
        for (key, value) in root {
            vars.push(key.clone());
            if let serde_json::Value::Object(child) = value {
                vars.extend(child.keys().map(|k| format!("{key}.{k}")));
            }
        }
    }
    vars
}
