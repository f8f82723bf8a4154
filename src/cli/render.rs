//! Render a single template of a job.
//!
//! # Examples
//!
//! ```bash
//! release-templates render --release release --job loggr-syslog-binding-cache \
//!     --properties props.yml --links links.yml
//!
//! release-templates render -r release -j loggr-syslog-binding-cache \
//!     -t config/certs/api_ca.crt -p props.yml -l links.yml -o api_ca.crt
//! ```

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::common::{InputArgs, JobArgs, RenderInputs, load_job};
use crate::config::ToolConfig;
use crate::constants::BPM_DESTINATION;

#[derive(Args, Debug)]
pub struct RenderCommand {
    #[command(flatten)]
    pub job: JobArgs,

    /// Destination path of the template, as declared in the job spec
    #[arg(short, long, value_name = "DEST", default_value = BPM_DESTINATION)]
    pub template: String,

    #[command(flatten)]
    pub inputs: InputArgs,

    /// Write to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl RenderCommand {
    pub async fn execute(self, config: &ToolConfig) -> Result<()> {
        let job = load_job(&self.job, config)?;
        let template = job.template(&self.template)?;
        let inputs = RenderInputs::load(&self.inputs, config).await?;

        let rendered = template
            .render_with(&inputs.properties, &inputs.links, &inputs.options)
            .with_context(|| format!("Failed to render '{}' of job '{}'", self.template, job.name()))?;

        match &self.output {
            Some(path) => {
                tokio::fs::write(path, &rendered)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                tracing::info!("Wrote {} ({} bytes)", path.display(), rendered.len());
            }
            None => print!("{rendered}"),
        }

        Ok(())
    }
}
