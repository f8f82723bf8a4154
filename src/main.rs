//! release-templates CLI entry point
//!
//! Parses arguments, runs the selected command and prints failures as a
//! user-friendly error before exiting with status 1:
//! - `render` - Render one template of a job
//! - `validate` - Render every template of a job
//! - `jobs` - List the jobs of a release

use anyhow::Result;
use clap::Parser;
use release_templates::cli;
use release_templates::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
