//! Validate that every template of a job renders.
//!
//! Each template is rendered with the given inputs; `config/bpm.yml` must also
//! parse as a BPM document with at least one process.
//!
//! ```bash
//! release-templates validate -r release -j loggr-syslog-binding-cache -p props.yml -l links.yml
//! release-templates validate -r release -j loggr-syslog-binding-cache --format json
//! ```
//!
//! JSON output:
//!
//! ```json
//! {
//!   "valid": false,
//!   "job": "loggr-syslog-binding-cache",
//!   "templates": [
//!     { "destination": "config/bpm.yml", "valid": true, "processes": ["loggr-syslog-binding-cache"] },
//!     { "destination": "config/certs/api_ca.crt", "valid": false, "error": "Can't find property 'api.tls.ca_cert'" }
//!   ]
//! }
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use super::common::{InputArgs, JobArgs, OutputFormat, RenderInputs, load_job};
use crate::bpm::BpmConfig;
use crate::config::ToolConfig;
use crate::constants::BPM_DESTINATION;
use crate::core::RenderError;
use crate::job::Template;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    #[command(flatten)]
    pub job: JobArgs,

    #[command(flatten)]
    pub inputs: InputArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct ValidationResults {
    valid: bool,
    job: String,
    templates: Vec<TemplateResult>,
}

#[derive(Debug, Serialize)]
struct TemplateResult {
    destination: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    processes: Option<Vec<String>>,
}

impl ValidateCommand {
    pub async fn execute(self, config: &ToolConfig) -> Result<()> {
        let job = load_job(&self.job, config)?;
        let inputs = RenderInputs::load(&self.inputs, config).await?;

        let templates = job
            .templates()?
            .iter()
            .map(|template| check_template(template, &inputs))
            .collect::<Vec<_>>();

        let results = ValidationResults {
            valid: templates.iter().all(|t| t.valid),
            job: job.name().to_string(),
            templates,
        };

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
            OutputFormat::Text => print_text(&results),
        }

        if results.valid {
            Ok(())
        } else {
            let failed = results.templates.iter().filter(|t| !t.valid).count();
            Err(anyhow::anyhow!(
                "Validation failed for job '{}': {} of {} templates did not render",
                results.job,
                failed,
                results.templates.len()
            ))
        }
    }
}

fn check_template(template: &Template, inputs: &RenderInputs) -> TemplateResult {
    let outcome = template
        .render_with(&inputs.properties, &inputs.links, &inputs.options)
        .and_then(|rendered| {
            if template.destination() == BPM_DESTINATION {
                check_bpm(&rendered).map(Some)
            } else {
                Ok(None)
            }
        });

    match outcome {
        Ok(processes) => TemplateResult {
            destination: template.destination().to_string(),
            valid: true,
            error: None,
            processes,
        },
        Err(err) => {
            tracing::debug!("Template '{}' failed: {:?}", template.destination(), err);
            TemplateResult {
                destination: template.destination().to_string(),
                valid: false,
                error: Some(err.to_string()),
                processes: None,
            }
        }
    }
}

/// Process names of a rendered `bpm.yml`; an empty process list is invalid.
fn check_bpm(rendered: &str) -> Result<Vec<String>, RenderError> {
    let bpm = BpmConfig::from_yaml(rendered)?;
    if bpm.processes.is_empty() {
        return Err(RenderError::InvalidDocument {
            reason: "bpm.yml declares no processes".to_string(),
        });
    }
    Ok(bpm.processes.into_iter().map(|p| p.name).collect())
}

fn print_text(results: &ValidationResults) {
    println!("Job {}", results.job.bold());
    for template in &results.templates {
        if template.valid {
            match &template.processes {
                Some(processes) => println!(
                    "  {} {} ({})",
                    "✓".green(),
                    template.destination,
                    processes.join(", ")
                ),
                None => println!("  {} {}", "✓".green(), template.destination),
            }
        } else {
            println!(
                "  {} {}: {}",
                "✗".red(),
                template.destination,
                template.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}
