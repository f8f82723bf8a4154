//! `render` and `jobs` through the compiled binary.

use release_templates::bpm::BpmConfig;
use release_templates::test_utils::bundled_release_dir;

use crate::common::{BINDING_CACHE_PROPERTIES, CLOUD_CONTROLLER_LINKS, TestWorkspace};

const JOB: &str = "loggr-syslog-binding-cache";

fn release() -> String {
    bundled_release_dir().display().to_string()
}

#[test]
fn test_render_bpm_to_stdout() {
    let ws = TestWorkspace::new().unwrap();
    let props = ws.write("props.yml", BINDING_CACHE_PROPERTIES).unwrap();
    let links = ws.write("links.yml", CLOUD_CONTROLLER_LINKS).unwrap();

    let output = ws
        .run(&[
            "render",
            "--release",
            &release(),
            "--job",
            JOB,
            "--properties",
            props.to_str().unwrap(),
            "--links",
            links.to_str().unwrap(),
        ])
        .unwrap();
    output.assert_success();

    let bpm = BpmConfig::from_yaml(&output.stdout).unwrap();
    assert_eq!(
        bpm.processes[0].env["AGGREGATE_DRAIN_CERTIFICATES"],
        "aggregate_drain_certificates"
    );
    assert_eq!(bpm.processes[0].env["CACHE_PORT"], "8888");
}

#[test]
fn test_render_to_output_file() {
    let ws = TestWorkspace::new().unwrap();
    let props = ws
        .write(
            "props.yml",
            "tls:\n  ca_cert: |\n    -----BEGIN CERTIFICATE-----\n    MIIB\n    -----END CERTIFICATE-----\n",
        )
        .unwrap();
    let links = ws.write("links.yml", CLOUD_CONTROLLER_LINKS).unwrap();
    let out = ws.path().join("ca.crt");

    ws.run(&[
        "render",
        "-r",
        &release(),
        "-j",
        JOB,
        "-t",
        "config/certs/binding_cache_ca.crt",
        "-p",
        props.to_str().unwrap(),
        "-l",
        links.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
    ])
    .unwrap()
    .assert_success();

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("-----BEGIN CERTIFICATE-----\nMIIB\n"));
}

#[test]
fn test_render_missing_link_fails_with_suggestion() {
    let ws = TestWorkspace::new().unwrap();
    let props = ws.write("props.yml", BINDING_CACHE_PROPERTIES).unwrap();

    let output = ws
        .run(&["render", "-r", &release(), "-j", JOB, "-p", props.to_str().unwrap()])
        .unwrap();
    output
        .assert_failure()
        .assert_stderr_contains("Link 'cloud_controller' consumed by job 'loggr-syslog-binding-cache' is not satisfied")
        .assert_stderr_contains("suggestion");
    assert!(output.stdout.is_empty());
}

#[test]
fn test_render_missing_property_fails() {
    let ws = TestWorkspace::new().unwrap();
    let links = ws.write("links.yml", CLOUD_CONTROLLER_LINKS).unwrap();

    ws.run(&["render", "-r", &release(), "-j", JOB, "-l", links.to_str().unwrap()])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("Can't find property 'api.tls.cn'");
}

#[test]
fn test_render_unknown_template() {
    let ws = TestWorkspace::new().unwrap();

    ws.run(&["render", "-r", &release(), "-j", JOB, "-t", "config/nope.yml"])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("Template 'config/nope.yml' not found")
        .assert_stderr_contains("config/bpm.yml");
}

#[test]
fn test_render_unknown_job() {
    let ws = TestWorkspace::new().unwrap();

    ws.run(&["render", "-r", &release(), "-j", "nope"])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("Job 'nope' not found");
}

#[test]
fn test_render_without_release() {
    let ws = TestWorkspace::new().unwrap();

    ws.run(&["render", "-j", JOB])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("No release directory given");
}

#[test]
fn test_jobs_lists_bundled_job() {
    let ws = TestWorkspace::new().unwrap();

    ws.run(&["jobs", "--release", &release()])
        .unwrap()
        .assert_success()
        .assert_stdout_contains(JOB)
        .assert_stdout_contains("bpm.yml.tera -> config/bpm.yml")
        .assert_stdout_contains("consumes: cloud_controller");
}

#[test]
fn test_jobs_json() {
    let ws = TestWorkspace::new().unwrap();

    let output = ws.run(&["jobs", "--release", &release(), "--format", "json"]).unwrap();
    output.assert_success();

    let jobs: serde_json::Value = serde_json::from_str(&output.stdout).unwrap();
    assert_eq!(jobs[0]["name"], JOB);
    assert_eq!(jobs[0]["templates"].as_array().map(Vec::len), Some(7));
    assert_eq!(jobs[0]["consumes"][0], "cloud_controller");
}
