//! Tera templating for job templates.
//!
//! A job template is a Tera document rendered once per instance. Inputs reach
//! it three ways:
//!
//! - `spec`: the instance being rendered for (`spec.index`, `spec.address`,
//!   `spec.job.name`, ...)
//! - functions: `p`, `has_p`, `link`, `has_link` and `link_p`, which read the
//!   job's resolved properties and consumed links
//! - the `env_value` filter, which quotes any value for a `bpm.yml` `env:` entry
//!
//! # Example
//!
//! ```text
//! {% set cc = link(name="cloud_controller") -%}
//! {% set api_url = "https://" ~ cc.address ~ ":9023" -%}
//! processes:
//!   - name: {{ spec.job.name }}
//!     env:
//!       API_URL: {{ api_url | env_value }}
//!       COMMON_NAME: {{ p(name="tls.cn") | env_value }}
//!       {%- if has_p(name="metrics.port") %}
//!       METRICS_PORT: {{ p(name="metrics.port") | env_value }}
//!       {%- endif %}
//! ```
//!
//! # Syntax Restrictions
//!
//! Each template is rendered on its own Tera instance, so `{% include %}`,
//! `{% extends %}` and `{% import %}` have nothing to resolve against. The
//! built-in `get_env`, `now` and `get_random` functions are replaced with
//! functions that fail, keeping rendering a pure function of its inputs.
//!
//! # Errors
//!
//! Every failure surfaces as a [`RenderError`](crate::core::RenderError). Errors
//! raised by template functions keep their variant; see
//! [`error::find_render_error`].

pub mod context;
pub mod error;
pub mod filters;
pub mod functions;
pub mod renderer;


pub use context::build_context;
pub use error::find_render_error;
pub use filters::{env_string, yaml_double_quote};
pub use renderer::TemplateRenderer;

use crate::job::InstanceSpec;

/// Per-render settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Instance exposed to templates as `spec`.
    pub instance: InstanceSpec,
    /// Reject supplied links the job does not consume instead of ignoring them.
    pub strict_links: bool,
}

impl RenderOptions {
    pub fn with_instance(mut self, instance: InstanceSpec) -> Self {
        self.instance = instance;
        self
    }

    pub fn with_strict_links(mut self, strict: bool) -> Self {
        self.strict_links = strict;
        self
    }
}
