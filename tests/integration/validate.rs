//! `validate` through the compiled binary.

use release_templates::test_utils::{ReleaseFixture, bundled_release_dir};

use crate::common::{BINDING_CACHE_PROPERTIES, CLOUD_CONTROLLER_LINKS, TestWorkspace};

const JOB: &str = "loggr-syslog-binding-cache";

const FULL_TLS: &str = r#"
api:
  tls:
    cn: CN
    ca_cert: api-ca
    cert: api-cert
    key: api-key
tls:
  cn: CN
  ca_cert: cache-ca
  cert: cache-cert
  key: cache-key
"#;

#[test]
fn test_validate_all_templates_render() {
    let ws = TestWorkspace::new().unwrap();
    let props = ws.write("props.yml", FULL_TLS).unwrap();
    let links = ws.write("links.yml", CLOUD_CONTROLLER_LINKS).unwrap();

    ws.run(&[
        "validate",
        "-r",
        &bundled_release_dir().display().to_string(),
        "-j",
        JOB,
        "-p",
        props.to_str().unwrap(),
        "-l",
        links.to_str().unwrap(),
    ])
    .unwrap()
    .assert_success()
    .assert_stdout_contains("✓ config/bpm.yml (loggr-syslog-binding-cache)")
    .assert_stdout_contains("✓ config/certs/binding_cache.key");
}

#[test]
fn test_validate_reports_each_failure_as_json() {
    let ws = TestWorkspace::new().unwrap();
    let props = ws.write("props.yml", BINDING_CACHE_PROPERTIES).unwrap();
    let links = ws.write("links.yml", CLOUD_CONTROLLER_LINKS).unwrap();

    let output = ws
        .run(&[
            "validate",
            "-r",
            &bundled_release_dir().display().to_string(),
            "-j",
            JOB,
            "-p",
            props.to_str().unwrap(),
            "-l",
            links.to_str().unwrap(),
            "--format",
            "json",
        ])
        .unwrap();
    output.assert_failure();

    let results: serde_json::Value = serde_json::from_str(&output.stdout).unwrap();
    assert_eq!(results["valid"], false);
    assert_eq!(results["job"], JOB);

    let templates = results["templates"].as_array().unwrap();
    assert_eq!(templates.len(), 7);
    assert_eq!(templates[0]["destination"], "config/bpm.yml");
    assert_eq!(templates[0]["valid"], true);
    assert_eq!(templates[0]["processes"][0], JOB);
    assert_eq!(templates[1]["valid"], false);
    assert_eq!(templates[1]["error"], "Can't find property 'api.tls.ca_cert'");
}

#[test]
fn test_validate_rejects_unparseable_bpm() {
    let release = ReleaseFixture::new()
        .unwrap()
        .job("broken", "name: broken\ntemplates:\n  bpm.yml.tera: config/bpm.yml\n")
        .unwrap()
        .template("broken", "bpm.yml.tera", "processes:\n  - name: x\n    env:\n      A: [1]\n")
        .unwrap();
    let ws = TestWorkspace::new().unwrap();

    ws.run(&["validate", "-r", release.path().to_str().unwrap(), "-j", "broken"])
        .unwrap()
        .assert_failure()
        .assert_stdout_contains("✗ config/bpm.yml: Rendered document is invalid")
        .assert_stderr_contains("Validation failed for job 'broken'");
}
