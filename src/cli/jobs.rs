//! List the jobs of a release with their templates and consumed links.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use super::common::{OutputFormat, resolve_release};
use crate::config::ToolConfig;
use crate::job::JobSpec;

#[derive(Args, Debug)]
pub struct JobsCommand {
    /// Release directory (contains `jobs/`). Falls back to `release_dir` in the config file.
    #[arg(short, long, value_name = "DIR")]
    pub release: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct JobSummary {
    name: String,
    templates: Vec<TemplateSummary>,
    consumes: Vec<String>,
}

#[derive(Debug, Serialize)]
struct TemplateSummary {
    source: String,
    destination: String,
}

impl From<&JobSpec> for JobSummary {
    fn from(spec: &JobSpec) -> Self {
        Self {
            name: spec.name.clone(),
            templates: spec
                .templates
                .iter()
                .map(|t| TemplateSummary {
                    source: t.source.clone(),
                    destination: t.destination.clone(),
                })
                .collect(),
            consumes: spec
                .consumes
                .iter()
                .map(|c| if c.optional { format!("{} (optional)", c.name) } else { c.name.clone() })
                .collect(),
        }
    }
}

impl JobsCommand {
    pub async fn execute(self, config: &ToolConfig) -> Result<()> {
        let release = resolve_release(self.release.as_deref(), config)?;

        let mut summaries = Vec::new();
        for name in release.jobs()? {
            let job = release.job(&name)?;
            summaries.push(JobSummary::from(job.spec()));
        }

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
            OutputFormat::Text => {
                if summaries.is_empty() {
                    println!("No jobs found in {}", release.path().display());
                }
                for job in &summaries {
                    println!("{}", job.name.bold());
                    for template in &job.templates {
                        println!("  {} -> {}", template.source, template.destination.cyan());
                    }
                    if !job.consumes.is_empty() {
                        println!("  consumes: {}", job.consumes.join(", "));
                    }
                }
            }
        }

        Ok(())
    }
}
