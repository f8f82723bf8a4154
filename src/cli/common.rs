//! Shared arguments and input loading for CLI commands.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use crate::config::ToolConfig;
use crate::job::{InstanceSpec, Job, ReleaseDir};
use crate::links::{Link, links_from_yaml_str};
use crate::properties::Properties;
use crate::templating::RenderOptions;

/// Output format for commands that report structured results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored text
    Text,
    /// Machine-readable JSON on stdout
    Json,
}

/// Arguments selecting a release and job.
#[derive(Args, Debug, Clone)]
pub struct JobArgs {
    /// Release directory (contains `jobs/`). Falls back to `release_dir` in the config file.
    #[arg(short, long, value_name = "DIR")]
    pub release: Option<PathBuf>,

    /// Job name under `jobs/`
    #[arg(short, long)]
    pub job: String,
}

/// Arguments naming the render inputs.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Properties file (YAML or JSON mapping)
    #[arg(short, long, value_name = "FILE")]
    pub properties: Option<PathBuf>,

    /// Links file (YAML or JSON sequence of links)
    #[arg(short, long, value_name = "FILE")]
    pub links: Option<PathBuf>,

    /// Instance spec file (YAML mapping); overrides `[instance]` from the config file
    #[arg(short, long, value_name = "FILE")]
    pub instance: Option<PathBuf>,
}

/// Everything a render needs besides the template itself.
#[derive(Debug, Clone)]
pub struct RenderInputs {
    pub properties: Properties,
    pub links: Vec<Link>,
    pub options: RenderOptions,
}

impl RenderInputs {
    /// Read the input files named in `args`; absent files mean empty inputs.
    pub async fn load(args: &InputArgs, config: &ToolConfig) -> Result<Self> {
        let properties = match &args.properties {
            Some(path) => Properties::from_yaml_file(path)
                .await
                .with_context(|| format!("Failed to load properties from {}", path.display()))?,
            None => Properties::new(),
        };

        let links = match &args.links {
            Some(path) => links_from_yaml_str(&read_input(path, "links").await?)
                .with_context(|| format!("Failed to load links from {}", path.display()))?,
            None => Vec::new(),
        };

        let mut options = config.render_options();
        if let Some(path) = &args.instance {
            options.instance = InstanceSpec::from_yaml_str(&read_input(path, "instance").await?)
                .with_context(|| format!("Failed to load instance spec from {}", path.display()))?;
        }

        tracing::debug!(
            "Loaded inputs: {} top-level properties, {} links, instance {}/{}",
            properties.to_value().as_object().map_or(0, |o| o.len()),
            links.len(),
            options.instance.name,
            options.instance.index
        );

        Ok(Self {
            properties,
            links,
            options,
        })
    }
}

async fn read_input(path: &Path, kind: &str) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| crate::core::RenderError::io(path, &e))
        .with_context(|| format!("Failed to read {kind} file: {}", path.display()))
}

/// The release from `--release`, else from the config file.
pub fn resolve_release(flag: Option<&Path>, config: &ToolConfig) -> Result<ReleaseDir> {
    let root = flag
        .map(Path::to_path_buf)
        .or_else(|| config.release_dir.clone())
        .ok_or_else(|| {
            anyhow::anyhow!("No release directory given: pass --release or set release_dir in the config file")
        })?;

    if !root.is_dir() {
        anyhow::bail!("Release directory {} does not exist", root.display());
    }
    Ok(ReleaseDir::new(root))
}

/// Load the job selected by `args`.
pub fn load_job(args: &JobArgs, config: &ToolConfig) -> Result<Job> {
    let release = resolve_release(args.release.as_deref(), config)?;
    Ok(release.job(&args.job)?)
}
