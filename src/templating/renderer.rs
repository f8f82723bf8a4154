//! Template rendering engine with Tera.
//!
//! [`TemplateRenderer`] wraps a fresh Tera instance per render, registered with
//! the property/link functions and the `env_value` filter.

use std::sync::Arc;
use tera::{Context as TeraContext, Tera};

use super::RenderOptions;
use super::context::build_context;
use super::error::from_tera_error;
use super::filters::{ENV_VALUE_FILTER, env_value_filter};
use super::functions::register_functions;
use crate::core::RenderError;
use crate::job::Template;
use crate::links::{Link, ResolvedLinks};
use crate::properties::{Properties, ResolvedProperties};

/// Renders job templates.
///
/// # Security
///
/// Templates are evaluated in a sandbox:
/// - No includes or extends; each template is rendered on its own
/// - No access to the process environment, the clock or randomness
/// - No auto-escaping, the output is YAML or plain text rather than HTML
#[derive(Debug, Clone, Default)]
pub struct TemplateRenderer {
    options: RenderOptions,
}

impl TemplateRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render `template` for the given properties and links.
    ///
    /// Consumed links are checked before the body is evaluated, so a missing
    /// required link fails even when the template never reads it.
    ///
    /// # Errors
    ///
    /// - [`RenderError::UnsatisfiedLink`] / [`RenderError::UndeclaredLink`] from link resolution
    /// - [`RenderError::MissingProperty`] / [`RenderError::MissingLinkProperty`] from template functions
    /// - [`RenderError::UndefinedVariable`] / [`RenderError::TemplateSyntax`] from Tera
    pub fn render(
        &self,
        template: &Template,
        properties: &Properties,
        links: &[Link],
    ) -> Result<String, RenderError> {
        let spec = template.job_spec();
        tracing::debug!(
            "Rendering '{}' -> '{}' for job '{}'",
            template.source(),
            template.destination(),
            spec.name
        );

        let links = ResolvedLinks::resolve(spec, links, self.options.strict_links)?;
        let properties = ResolvedProperties::resolve(spec, properties);
        let context = build_context(&self.options.instance, &spec.name);

        let rendered = self.render_str(
            template.source(),
            template.body(),
            &context,
            Arc::new(properties),
            Arc::new(links),
        )?;

        tracing::debug!("Rendered '{}' ({} bytes)", template.destination(), rendered.len());
        Ok(rendered)
    }

    /// Render a raw template body against pre-resolved inputs.
    pub fn render_str(
        &self,
        name: &str,
        body: &str,
        context: &TeraContext,
        properties: Arc<ResolvedProperties>,
        links: Arc<ResolvedLinks>,
    ) -> Result<String, RenderError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.register_filter(ENV_VALUE_FILTER, env_value_filter);
        register_functions(&mut tera, properties, links);

        tera.add_raw_template(name, body).map_err(|e| from_tera_error(&e, name, context))?;

        tera.render(name, context).map_err(|e| {
            let err = from_tera_error(&e, name, context);
            tracing::debug!("Rendering '{}' failed: {}", name, err);
            err
        })
    }
}
