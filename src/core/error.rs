//! Error handling for release-templates
//!
//! This module provides the typed error returned by every rendering operation and
//! the user-facing wrapper the CLI prints. The error system follows two rules:
//! 1. **Strongly-typed errors** ([`RenderError`]) so callers and tests can match on
//!    the precise failure (`MissingProperty`, `UnsatisfiedLink`, ...)
//! 2. **User-friendly messages** ([`ErrorContext`]) with details and an actionable
//!    suggestion for people running the CLI
//!
//! Use [`user_friendly_error`] to turn any [`anyhow::Error`] coming out of the CLI
//! into an [`ErrorContext`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use release_templates::core::{RenderError, user_friendly_error};
//!
//! let err = RenderError::UnsatisfiedLink {
//!     job: "loggr-syslog-binding-cache".to_string(),
//!     name: "cloud_controller".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(err));
//! ctx.display(); // colored error, details and suggestion on stderr
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for template rendering.
///
/// Every variant carries owned strings only, which keeps the type `Clone` and lets the
/// renderer recover the original error after it has travelled through Tera's error
/// chain (see [`crate::templating::error::find_render_error`]).
///
/// # Error Categories
///
/// ## Inputs
/// - [`MissingProperty`] - A property the template reads is neither supplied nor defaulted
/// - [`UnsatisfiedLink`] - A consumed link was not supplied
/// - [`MissingLinkProperty`] - A link property the template reads is absent
/// - [`InvalidProperties`] / [`InvalidLinks`] / [`InvalidInstance`] - Malformed input files
///
/// ## Release layout
/// - [`JobNotFound`] / [`TemplateNotFound`] / [`InvalidJobSpec`]
///
/// ## Rendering and output
/// - [`TemplateSyntax`] / [`UndefinedVariable`] - Tera failures
/// - [`InvalidDocument`] / [`ProcessNotFound`] - Rendered `bpm.yml` problems
///
/// [`MissingProperty`]: RenderError::MissingProperty
/// [`UnsatisfiedLink`]: RenderError::UnsatisfiedLink
/// [`MissingLinkProperty`]: RenderError::MissingLinkProperty
/// [`InvalidProperties`]: RenderError::InvalidProperties
/// [`InvalidLinks`]: RenderError::InvalidLinks
/// [`InvalidInstance`]: RenderError::InvalidInstance
/// [`JobNotFound`]: RenderError::JobNotFound
/// [`TemplateNotFound`]: RenderError::TemplateNotFound
/// [`InvalidJobSpec`]: RenderError::InvalidJobSpec
/// [`TemplateSyntax`]: RenderError::TemplateSyntax
/// [`UndefinedVariable`]: RenderError::UndefinedVariable
/// [`InvalidDocument`]: RenderError::InvalidDocument
/// [`ProcessNotFound`]: RenderError::ProcessNotFound
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A required property was absent from the property tree and has no default.
    ///
    /// `suggestions` holds the closest declared property names when the requested
    /// name is not declared by the job at all.
    #[error("Can't find property '{name}'")]
    MissingProperty {
        /// Dotted property name as requested by the template
        name: String,
        /// Declared property names that look similar
        suggestions: Vec<String>,
    },

    /// A link the job consumes was not supplied to the render call.
    #[error("Link '{name}' consumed by job '{job}' is not satisfied")]
    UnsatisfiedLink {
        /// Job doing the consuming
        job: String,
        /// Consumed link name
        name: String,
    },

    /// A supplied link was not declared in the job's `consumes` (strict mode only).
    #[error("Link '{name}' is not consumed by job '{job}'")]
    UndeclaredLink {
        /// Job the links were supplied to
        job: String,
        /// Supplied link name
        name: String,
    },

    /// A link property requested by the template is absent and has no default.
    #[error("Can't find property '{name}' on link '{link}'")]
    MissingLinkProperty {
        /// Link name
        link: String,
        /// Dotted property name
        name: String,
    },

    /// No `jobs/<name>/spec` exists in the release.
    #[error("Job '{name}' not found in release {release}")]
    JobNotFound {
        /// Requested job name
        name: String,
        /// Release directory searched
        release: String,
    },

    /// The job spec has no template with the requested destination.
    #[error("Template '{destination}' not found in job '{job}'")]
    TemplateNotFound {
        /// Job name
        job: String,
        /// Destination path, e.g. `config/bpm.yml`
        destination: String,
        /// Destinations the job does declare
        available: Vec<String>,
    },

    /// The job spec file could not be parsed or is inconsistent.
    #[error("Invalid job spec {file}: {reason}")]
    InvalidJobSpec {
        /// Spec file path
        file: String,
        /// What was wrong
        reason: String,
    },

    /// The property tree is not a mapping or could not be parsed.
    #[error("Invalid properties: {reason}")]
    InvalidProperties {
        /// What was wrong
        reason: String,
    },

    /// The links input could not be parsed.
    #[error("Invalid links: {reason}")]
    InvalidLinks {
        /// What was wrong
        reason: String,
    },

    /// The instance spec input could not be parsed.
    #[error("Invalid instance spec: {reason}")]
    InvalidInstance {
        /// What was wrong
        reason: String,
    },

    /// Tera could not parse or evaluate the template.
    #[error("Template syntax error in '{template}': {message}")]
    TemplateSyntax {
        /// Template source file name
        template: String,
        /// Cleaned Tera message
        message: String,
        /// 1-indexed line, when Tera reported one
        line: Option<usize>,
    },

    /// The template referenced a context variable that does not exist.
    #[error("Template variable not found in '{template}': '{variable}'")]
    UndefinedVariable {
        /// Template source file name
        template: String,
        /// Variable as written in the template
        variable: String,
        /// Similar variable names from the context
        suggestions: Vec<String>,
    },

    /// The rendered output is not a valid document of the expected shape.
    #[error("Rendered document is invalid: {reason}")]
    InvalidDocument {
        /// What was wrong
        reason: String,
    },

    /// A process index past the end of the `processes` list.
    #[error("Process {index} not found ({count} processes rendered)")]
    ProcessNotFound {
        /// Requested index
        index: usize,
        /// Number of processes available
        count: usize,
    },

    /// Anything not covered above, usually from the CLI layer.
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },

    /// File system failure while reading the release or input files.
    #[error("I/O error on {path}: {message}")]
    Io {
        /// Path being accessed
        path: String,
        /// Underlying error message
        message: String,
    },
}

impl RenderError {
    /// Build an [`RenderError::Io`] from a path and an [`std::io::Error`].
    pub fn io(path: impl AsRef<std::path::Path>, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }

    /// Shorthand for a [`RenderError::MissingProperty`] without suggestions.
    pub fn missing_property(name: impl Into<String>) -> Self {
        Self::MissingProperty {
            name: name.into(),
            suggestions: Vec::new(),
        }
    }
}

/// Error wrapper with a suggestion and details for CLI display.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: RenderError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: RenderError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error (shown in green).
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error (shown in yellow).
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error, details and suggestion to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] suitable for the CLI.
///
/// [`RenderError`]s anywhere in the chain get tailored details and suggestions.
/// Other errors are wrapped as-is, with the full `anyhow` chain in the details.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(render_error) = error.chain().find_map(|e| e.downcast_ref::<RenderError>()) {
        return create_error_context(render_error.clone());
    }

    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();

    // A bare io::Error carries no path; contexts added with `.with_context` do.
    if chain.is_empty() {
        if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
            return ErrorContext::new(RenderError::Io {
                path: "unknown".to_string(),
                message: io_error.to_string(),
            })
            .with_suggestion("Check that the file or directory exists and is readable");
        }
    }

    let ctx = ErrorContext::new(RenderError::Other {
        message: error.to_string(),
    });
    if chain.is_empty() {
        ctx
    } else {
        ctx.with_details(chain.join(": "))
    }
}

fn create_error_context(error: RenderError) -> ErrorContext {
    match &error {
        RenderError::MissingProperty { name, suggestions } => {
            let suggestion = if suggestions.is_empty() {
                format!("Set '{name}' in the properties file or give it a default in the job spec")
            } else {
                format!("Did you mean one of: {}?", suggestions.join(", "))
            };
            ErrorContext::new(error.clone())
                .with_suggestion(suggestion)
                .with_details(
                    "Templates may only read properties declared in the job spec; declared properties without a default must be supplied",
                )
        }

        RenderError::UnsatisfiedLink { name, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Supply a link named '{name}' in the links file, or mark the consumption optional in the job spec"
            ))
            .with_details("Every non-optional entry under 'consumes' must be matched by a supplied link"),

        RenderError::UndeclaredLink { name, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Remove '{name}' from the links file or add it to the job's 'consumes'"
            ))
            .with_details("strict_links is enabled in the configuration"),

        RenderError::MissingLinkProperty { link, name } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Add '{name}' to the properties of link '{link}' or pass a default to link_p()"
            )),

        RenderError::JobNotFound { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Run 'release-templates jobs' to list the jobs in the release")
            .with_details("Jobs are read from <release>/jobs/<name>/spec"),

        RenderError::TemplateNotFound { available, .. } => {
            let ctx = ErrorContext::new(error.clone());
            if available.is_empty() {
                ctx.with_details("The job spec declares no templates")
            } else {
                ctx.with_suggestion(format!("Available templates: {}", available.join(", ")))
            }
        }

        RenderError::InvalidJobSpec { file, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Check the YAML in {file}: templates must map source files to destinations"
            )),

        RenderError::InvalidProperties { .. } => ErrorContext::new(error.clone())
            .with_suggestion("The properties file must be a YAML or JSON mapping at the top level"),

        RenderError::InvalidLinks { .. } => ErrorContext::new(error.clone())
            .with_suggestion("The links file must be a YAML sequence of links, each with a 'name' and 'instances'"),

        RenderError::InvalidInstance { .. } => ErrorContext::new(error.clone())
            .with_suggestion("The instance file must be a YAML mapping (name, id, index, az, address, ...)"),

        RenderError::TemplateSyntax { line, .. } => {
            let ctx = ErrorContext::new(error.clone()).with_suggestion(
                "Check for unclosed {{ }} or {% %} delimiters, unknown filters and missing quotes",
            );
            match line {
                Some(line) => ctx.with_details(format!("Reported at line {line}")),
                None => ctx,
            }
        }

        RenderError::UndefinedVariable { suggestions, .. } => {
            let ctx = ErrorContext::new(error.clone());
            if suggestions.is_empty() {
                ctx.with_suggestion("Properties are read with p(name=\"...\"), not as bare variables")
            } else {
                ctx.with_suggestion(format!("Did you mean one of: {}?", suggestions.join(", ")))
            }
        }

        RenderError::InvalidDocument { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Render the template with 'release-templates render' and inspect the output")
            .with_details("Values written into YAML should go through the env_value filter"),

        RenderError::ProcessNotFound { .. } | RenderError::Other { .. } => {
            ErrorContext::new(error.clone())
        }

        RenderError::Io { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Check that the file or directory exists and is readable"),
    }
}
