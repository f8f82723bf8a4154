//! Common test utilities for release-templates integration tests

// Not every helper is used by every test module
#![allow(dead_code)]

use anyhow::{Context, Result};
use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch directory holding CLI input files and an empty config file, so runs
/// never pick up the developer's own configuration.
pub struct TestWorkspace {
    temp: TempDir,
    config: PathBuf,
}

impl TestWorkspace {
    pub fn new() -> Result<Self> {
        let temp = TempDir::new().context("Failed to create workspace")?;
        let config = temp.path().join("config.toml");
        std::fs::write(&config, "")?;
        Ok(Self {
            temp,
            config,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn config_path(&self) -> &Path {
        &self.config
    }

    /// Write `content` to `name` inside the workspace and return its path.
    pub fn write(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.temp.path().join(name);
        std::fs::write(&path, content).with_context(|| format!("Failed to write {name}"))?;
        Ok(path)
    }

    /// Run the binary with `--config <empty>` prepended.
    pub fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = Command::cargo_bin("release-templates")?
            .arg("--config")
            .arg(&self.config)
            .args(args)
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .output()
            .context("Failed to run release-templates")?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

/// Command output helper
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Assert the command succeeded
    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success,
            "Command failed with code {:?}\nStderr: {}",
            self.code, self.stderr
        );
        self
    }

    /// Assert the command exited with status 1
    pub fn assert_failure(&self) -> &Self {
        assert_eq!(self.code, Some(1), "Expected exit code 1\nStdout: {}", self.stdout);
        self
    }

    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Expected stdout to contain '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }

    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "Expected stderr to contain '{}'\nActual stderr: {}",
            text,
            self.stderr
        );
        self
    }
}

/// Links YAML with a single `cloud_controller` instance `a-b-c-d`.
pub const CLOUD_CONTROLLER_LINKS: &str = r#"
- name: cloud_controller
  type: cloud_controller
  instances:
    - id: a-b-c-d
"#;

/// Properties YAML satisfying the binding cache's required `bpm.yml` properties.
pub const BINDING_CACHE_PROPERTIES: &str = r#"
api:
  tls:
    cn: CN
tls:
  cn: CN
aggregate_drain_certificates: aggregate_drain_certificates
external_port: 8888
"#;
