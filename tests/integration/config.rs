//! Configuration file discovery through the binary.

use assert_cmd::Command;
use predicates::prelude::*;
use release_templates::test_utils::bundled_release_dir;
use serial_test::serial;

use crate::common::{BINDING_CACHE_PROPERTIES, CLOUD_CONTROLLER_LINKS, TestWorkspace};

const JOB: &str = "loggr-syslog-binding-cache";

#[test]
fn test_release_dir_from_config() {
    let ws = TestWorkspace::new().unwrap();
    let config = ws
        .write(
            "rt.toml",
            &format!("release_dir = {:?}\n", bundled_release_dir().display().to_string()),
        )
        .unwrap();

    Command::cargo_bin("release-templates")
        .unwrap()
        .args(["--config", config.to_str().unwrap(), "jobs"])
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains(JOB));
}

#[test]
fn test_strict_links_from_config() {
    let ws = TestWorkspace::new().unwrap();
    let config = ws.write("rt.toml", "strict_links = true\n").unwrap();
    let props = ws.write("props.yml", BINDING_CACHE_PROPERTIES).unwrap();
    let links = ws
        .write("links.yml", &format!("{CLOUD_CONTROLLER_LINKS}- name: uaa\n"))
        .unwrap();
    let release = bundled_release_dir().display().to_string();

    let args = [
        "render",
        "-r",
        release.as_str(),
        "-j",
        JOB,
        "-p",
        props.to_str().unwrap(),
        "-l",
        links.to_str().unwrap(),
    ];

    // Lenient by default: the extra link is ignored
    ws.run(&args).unwrap().assert_success();

    Command::cargo_bin("release-templates")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .args(args)
        .env("NO_COLOR", "1")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Link 'uaa' is not consumed"));
}

#[test]
#[serial]
fn test_config_from_environment_variable() {
    let ws = TestWorkspace::new().unwrap();
    let config = ws.write("env.toml", "[instance]\ndeployment = \"from-env\"\n").unwrap();

    Command::cargo_bin("release-templates")
        .unwrap()
        .args(["jobs", "-r", &bundled_release_dir().display().to_string()])
        .env("RELEASE_TEMPLATES_CONFIG", &config)
        .assert()
        .success();

    Command::cargo_bin("release-templates")
        .unwrap()
        .args(["jobs", "-r", &bundled_release_dir().display().to_string()])
        .env("RELEASE_TEMPLATES_CONFIG", ws.path().join("missing.toml"))
        .env("NO_COLOR", "1")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn test_invalid_config_is_reported() {
    let ws = TestWorkspace::new().unwrap();
    let config = ws.write("bad.toml", "strict_links = \"yes\"\n").unwrap();

    Command::cargo_bin("release-templates")
        .unwrap()
        .args(["--config", config.to_str().unwrap(), "jobs"])
        .env("NO_COLOR", "1")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse config file"));
}
