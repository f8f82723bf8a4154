//! Integration test suite for release-templates
//!
//! End-to-end tests that render the bundled release through the library API and
//! drive the compiled binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **bpm_rendering**: `config/bpm.yml` of `loggr-syslog-binding-cache`
//! - **templating**: template functions, errors and determinism on ad-hoc releases
//! - **commands**: `render` and `jobs` through the binary
//! - **validate**: `validate` through the binary
//! - **config**: configuration file discovery

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod bpm_rendering;
mod commands;
mod config;
mod validate;
