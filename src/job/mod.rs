//! Releases, jobs and their templates.
//!
//! A release directory holds one directory per job:
//!
//! ```text
//! release/
//! └── jobs/
//!     └── loggr-syslog-binding-cache/
//!         ├── spec
//!         └── templates/
//!             └── bpm.yml.tera
//! ```
//!
//! Templates are looked up by the destination path the spec maps them to, so
//! callers ask for `config/bpm.yml` rather than the source file name:
//!
//! ```rust,no_run
//! use release_templates::job::ReleaseDir;
//! use release_templates::links::{Link, LinkInstance};
//! use release_templates::properties::Properties;
//! use serde_json::json;
//!
//! # fn example() -> Result<(), release_templates::core::RenderError> {
//! let release = ReleaseDir::new("release");
//! let job = release.job("loggr-syslog-binding-cache")?;
//! let template = job.template("config/bpm.yml")?;
//!
//! let properties = Properties::from_value(json!({ "tls": { "cn": "CN" } }))?;
//! let links = vec![Link::new("cloud_controller").with_instance(LinkInstance::new("a-b-c-d"))];
//! let rendered = template.render(&properties, &links)?;
//! # Ok(())
//! # }
//! ```

pub mod instance;
pub mod spec;

pub use instance::InstanceSpec;
pub use spec::{JobSpec, LinkConsumption, LinkProvision, PropertyDefinition, TemplateEntry};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use crate::constants::{JOBS_DIR, SPEC_FILE, TEMPLATES_DIR};
use crate::core::RenderError;
use crate::links::Link;
use crate::properties::Properties;
use crate::templating::{RenderOptions, TemplateRenderer};

/// A release checked out on disk.
#[derive(Debug, Clone)]
pub struct ReleaseDir {
    root: PathBuf,
}

impl ReleaseDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Load `jobs/<name>`.
    pub fn job(&self, name: &str) -> Result<Job, RenderError> {
        let dir = self.root.join(JOBS_DIR).join(name);
        if !dir.join(SPEC_FILE).is_file() {
            return Err(RenderError::JobNotFound {
                name: name.to_string(),
                release: self.root.display().to_string(),
            });
        }
        Job::from_dir(dir)
    }

    /// Names of all jobs that have a `spec` file, sorted.
    pub fn jobs(&self) -> Result<Vec<String>, RenderError> {
        let jobs_dir = self.root.join(JOBS_DIR);
        let mut names = Vec::new();

        for entry in WalkDir::new(&jobs_dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| RenderError::Io {
                path: jobs_dir.display().to_string(),
                message: e.to_string(),
            })?;
            if entry.file_type().is_dir() && entry.path().join(SPEC_FILE).is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        names.sort();
        Ok(names)
    }
}

/// A job loaded from its directory.
#[derive(Debug, Clone)]
pub struct Job {
    dir: PathBuf,
    spec: Arc<JobSpec>,
}

impl Job {
    /// Load a job from a directory containing `spec` and `templates/`.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Result<Self, RenderError> {
        let dir = dir.into();
        let spec_path = dir.join(SPEC_FILE);
        let content =
            std::fs::read_to_string(&spec_path).map_err(|e| RenderError::io(&spec_path, &e))?;
        let spec = JobSpec::from_yaml_str(&content, &spec_path.display().to_string())?;

        tracing::debug!(
            "Loaded job '{}' ({} templates, {} properties, {} consumed links)",
            spec.name,
            spec.templates.len(),
            spec.properties.len(),
            spec.consumes.len()
        );

        Ok(Self {
            dir,
            spec: Arc::new(spec),
        })
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn spec(&self) -> &JobSpec {
        &self.spec
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The template rendered to `destination`, e.g. `config/bpm.yml`.
    pub fn template(&self, destination: &str) -> Result<Template, RenderError> {
        let entry =
            self.spec.template_for(destination).ok_or_else(|| RenderError::TemplateNotFound {
                job: self.spec.name.clone(),
                destination: destination.to_string(),
                available: self.spec.templates.iter().map(|t| t.destination.clone()).collect(),
            })?;
        self.load_template(entry)
    }

    /// Every template in spec order.
    pub fn templates(&self) -> Result<Vec<Template>, RenderError> {
        self.spec.templates.iter().map(|entry| self.load_template(entry)).collect()
    }

    fn load_template(&self, entry: &TemplateEntry) -> Result<Template, RenderError> {
        let path = self.dir.join(TEMPLATES_DIR).join(&entry.source);
        let body = std::fs::read_to_string(&path).map_err(|e| RenderError::io(&path, &e))?;
        Ok(Template::new(Arc::clone(&self.spec), entry.clone(), body))
    }
}

/// A single template of a job, with its body loaded.
#[derive(Debug, Clone)]
pub struct Template {
    spec: Arc<JobSpec>,
    entry: TemplateEntry,
    body: String,
}

impl Template {
    pub fn new(spec: Arc<JobSpec>, entry: TemplateEntry, body: String) -> Self {
        Self {
            spec,
            entry,
            body,
        }
    }

    pub fn source(&self) -> &str {
        &self.entry.source
    }

    pub fn destination(&self) -> &str {
        &self.entry.destination
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn job_spec(&self) -> &JobSpec {
        &self.spec
    }

    /// Render with the default instance spec.
    ///
    /// # Errors
    ///
    /// - [`RenderError::UnsatisfiedLink`] if a non-optional consumed link is absent
    /// - [`RenderError::MissingProperty`] if the template reads a property with no value
    /// - [`RenderError::TemplateSyntax`] for Tera parse/evaluation failures
    pub fn render(&self, properties: &Properties, links: &[Link]) -> Result<String, RenderError> {
        self.render_with(properties, links, &RenderOptions::default())
    }

    /// Render with explicit options (instance spec, strict link checking).
    pub fn render_with(
        &self,
        properties: &Properties,
        links: &[Link],
        options: &RenderOptions,
    ) -> Result<String, RenderError> {
        TemplateRenderer::new(options.clone()).render(self, properties, links)
    }
}
