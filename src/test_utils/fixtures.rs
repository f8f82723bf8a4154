//! Test fixtures: throwaway releases on disk and the standard binding-cache inputs.

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::constants::{JOBS_DIR, SPEC_FILE, TEMPLATES_DIR};
use crate::links::{Link, LinkInstance};
use crate::properties::Properties;

/// A release directory in a temporary location, removed on drop.
///
/// ```rust,no_run
/// use release_templates::test_utils::ReleaseFixture;
///
/// # fn example() -> anyhow::Result<()> {
/// let release = ReleaseFixture::new()?
///     .job("web", "name: web\ntemplates:\n  bpm.yml.tera: config/bpm.yml\n")?
///     .template("web", "bpm.yml.tera", "processes: []\n")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ReleaseFixture {
    temp: TempDir,
}

impl ReleaseFixture {
    /// An empty release with a `jobs/` directory.
    pub fn new() -> Result<Self> {
        let temp = TempDir::new().context("Failed to create temp release dir")?;
        fs::create_dir_all(temp.path().join(JOBS_DIR))?;
        Ok(Self {
            temp,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn job_dir(&self, job: &str) -> PathBuf {
        self.path().join(JOBS_DIR).join(job)
    }

    /// Write `jobs/<job>/spec`.
    pub fn job(self, job: &str, spec: &str) -> Result<Self> {
        let dir = self.job_dir(job);
        fs::create_dir_all(dir.join(TEMPLATES_DIR))?;
        fs::write(dir.join(SPEC_FILE), spec)
            .with_context(|| format!("Failed to write spec for {job}"))?;
        Ok(self)
    }

    /// Write `jobs/<job>/templates/<source>`.
    pub fn template(self, job: &str, source: &str, body: &str) -> Result<Self> {
        let path = self.job_dir(job).join(TEMPLATES_DIR).join(source);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(self)
    }

    /// Write an arbitrary file relative to the release root, for CLI inputs.
    pub fn file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }
}

/// The release shipped in this repository.
pub fn bundled_release_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("release")
}

/// Minimal properties satisfying every required property the binding cache's
/// `bpm.yml` reads.
pub fn binding_cache_properties_value() -> Value {
    json!({
        "api": { "tls": { "cn": "CN" } },
        "tls": { "cn": "CN" },
        "aggregate_drain_certificates": "aggregate_drain_certificates",
        "external_port": 8888,
    })
}

pub fn binding_cache_properties() -> Properties {
    Properties::from_value(binding_cache_properties_value())
        .expect("fixture properties are a mapping")
}

/// The `cloud_controller` link with a single instance `a-b-c-d`.
pub fn cloud_controller_link() -> Link {
    Link::new("cloud_controller").with_instance(LinkInstance::new("a-b-c-d"))
}
