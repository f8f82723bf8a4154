//! release-templates - render BOSH-style job templates
//!
//! A release contains jobs; each job has a `spec` declaring its templates, the
//! properties it accepts and the links it consumes. This crate renders those
//! templates (above all the process-manager config `config/bpm.yml`) from an
//! operator-supplied property tree, the consumed links and a description of the
//! instance being rendered for.
//!
//! # Architecture Overview
//!
//! - [`job`] loads a release directory, a job's spec and its template bodies
//! - [`properties`] resolves dotted property names against supplied values and spec defaults
//! - [`links`] checks supplied links against the job's `consumes`
//! - [`templating`] renders a template with Tera, exposing `p`, `link` and friends
//! - [`bpm`] parses a rendered `bpm.yml` into typed processes
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line interface (`render`, `validate`, `jobs`)
//! - [`config`] - Optional TOML tool configuration
//! - [`core`] - [`RenderError`](core::RenderError) and user-facing error context
//! - [`constants`] - Release layout and default values
//!
//! # Example
//!
//! ```rust,no_run
//! use release_templates::bpm::{BpmConfig, bpm_process};
//! use release_templates::job::ReleaseDir;
//! use release_templates::links::{Link, LinkInstance};
//! use release_templates::properties::Properties;
//! use serde_json::json;
//!
//! # fn example() -> Result<(), release_templates::core::RenderError> {
//! let job = ReleaseDir::new("release").job("loggr-syslog-binding-cache")?;
//! let template = job.template("config/bpm.yml")?;
//!
//! let properties = Properties::from_value(json!({
//!     "api": { "tls": { "cn": "CN" } },
//!     "tls": { "cn": "CN" },
//!     "aggregate_drain_certificates": "aggregate_drain_certificates",
//!     "external_port": 8888,
//! }))?;
//! let links = [Link::new("cloud_controller").with_instance(LinkInstance::new("a-b-c-d"))];
//!
//! let bpm = BpmConfig::from_yaml(&template.render(&properties, &links)?)?;
//! let process = bpm_process(&bpm, 0)?;
//! assert_eq!(process.env["AGGREGATE_DRAIN_CERTIFICATES"], "aggregate_drain_certificates");
//! # Ok(())
//! # }
//! ```
//!
//! # CLI
//!
//! ```bash
//! # Render bpm.yml to stdout
//! release-templates render --release release --job loggr-syslog-binding-cache \
//!     --properties props.yml --links links.yml
//!
//! # Render every template and check bpm.yml parses
//! release-templates validate -r release -j loggr-syslog-binding-cache -p props.yml -l links.yml
//!
//! # List jobs
//! release-templates jobs --release release
//! ```

// Core functionality modules
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;

// Release model
pub mod job;
pub mod links;
pub mod properties;

// Rendering and output
pub mod bpm;
pub mod templating;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
