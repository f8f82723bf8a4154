//! Rendering `config/bpm.yml` of the bundled `loggr-syslog-binding-cache` job.

use release_templates::bpm::{BpmConfig, BpmProcess, bpm_process};
use release_templates::core::RenderError;
use release_templates::job::{InstanceSpec, Job, ReleaseDir};
use release_templates::links::{Link, LinkInstance};
use release_templates::properties::Properties;
use release_templates::templating::RenderOptions;
use release_templates::test_utils::{
    binding_cache_properties, binding_cache_properties_value, bundled_release_dir,
    cloud_controller_link, init_test_logging,
};
use serde_json::json;

const JOB: &str = "loggr-syslog-binding-cache";
const CERTS: &str = "/var/vcap/jobs/loggr-syslog-binding-cache/config/certs";

fn job() -> Job {
    init_test_logging(None);
    ReleaseDir::new(bundled_release_dir()).job(JOB).unwrap()
}

fn render(properties: &Properties, links: &[Link]) -> Result<String, RenderError> {
    job().template("config/bpm.yml")?.render(properties, links)
}

fn first_process(rendered: &str) -> BpmProcess {
    let config = BpmConfig::from_yaml(rendered).unwrap();
    bpm_process(&config, 0).unwrap().clone()
}

fn with_drain_certificates(value: serde_json::Value) -> Properties {
    let mut props = binding_cache_properties_value();
    props["aggregate_drain_certificates"] = value;
    Properties::from_value(props).unwrap()
}

#[test]
fn test_aggregate_drain_certificates_env() {
    let rendered = render(&binding_cache_properties(), &[cloud_controller_link()]).unwrap();
    let process = first_process(&rendered);

    assert_eq!(process.name, JOB);
    assert_eq!(process.env["AGGREGATE_DRAIN_CERTIFICATES"], "aggregate_drain_certificates");
}

#[test]
fn test_full_environment() {
    let rendered = render(&binding_cache_properties(), &[cloud_controller_link()]).unwrap();
    let process = first_process(&rendered);
    let env = &process.env;

    assert_eq!(process.executable, "/var/vcap/packages/syslog-binding-cache/syslog-binding-cache");
    assert_eq!(env["API_URL"], "https://link.instance.address.com:9023");
    assert_eq!(env["API_CA_FILE_PATH"], format!("{CERTS}/api_ca.crt"));
    assert_eq!(env["API_CERT_FILE_PATH"], format!("{CERTS}/api_client.crt"));
    assert_eq!(env["API_KEY_FILE_PATH"], format!("{CERTS}/api_client.key"));
    assert_eq!(env["API_COMMON_NAME"], "CN");
    assert_eq!(env["API_POLLING_INTERVAL"], "15s");
    assert_eq!(env["API_BATCH_SIZE"], "1000");
    assert_eq!(
        env["CIPHER_SUITES"],
        "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256:TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384"
    );
    assert_eq!(env["CACHE_CA_FILE_PATH"], format!("{CERTS}/binding_cache_ca.crt"));
    assert_eq!(env["CACHE_CERT_FILE_PATH"], format!("{CERTS}/binding_cache.crt"));
    assert_eq!(env["CACHE_KEY_FILE_PATH"], format!("{CERTS}/binding_cache.key"));
    assert_eq!(env["CACHE_COMMON_NAME"], "CN");
    assert_eq!(env["CACHE_PORT"], "8888");
    assert_eq!(env["METRICS_PORT"], "14392");
    assert_eq!(env["DEBUG_METRICS"], "false");
    assert_eq!(env.len(), 16);
}

#[test]
fn test_awkward_certificate_strings_pass_through() {
    let pem = "-----BEGIN CERTIFICATE-----\nMIIBszCCAVmgAwIBAgIUQ0==\n-----END CERTIFICATE-----\n";
    for value in [
        "",
        "with: colon",
        "\"double\" and 'single' quotes",
        "line one\nline two",
        "# not a comment",
        "[not, a, list]",
        "{not: a map}",
        "trailing space ",
        "tab\there",
        "back\\slash",
        pem,
    ] {
        let rendered =
            render(&with_drain_certificates(json!(value)), &[cloud_controller_link()]).unwrap();
        assert_eq!(
            first_process(&rendered).env["AGGREGATE_DRAIN_CERTIFICATES"],
            value,
            "value {value:?} did not survive"
        );
    }
}

#[test]
fn test_structured_certificates_become_json() {
    let certs = json!([{ "cert": "-----BEGIN CERTIFICATE-----\nAAA\n-----END CERTIFICATE-----" }]);
    let rendered =
        render(&with_drain_certificates(certs.clone()), &[cloud_controller_link()]).unwrap();

    let env_value = &first_process(&rendered).env["AGGREGATE_DRAIN_CERTIFICATES"];
    let parsed: serde_json::Value = serde_json::from_str(env_value).unwrap();
    assert_eq!(parsed, certs);
}

#[test]
fn test_defaults_when_not_supplied() {
    let properties = Properties::from_value(json!({
        "api": { "tls": { "cn": "CN" } },
        "tls": { "cn": "CN" },
    }))
    .unwrap();

    let rendered = render(&properties, &[cloud_controller_link()]).unwrap();
    let env = first_process(&rendered).env;

    assert_eq!(env["CACHE_PORT"], "9000");
    assert_eq!(env["AGGREGATE_DRAIN_CERTIFICATES"], "[]");
    assert_eq!(env["API_POLLING_INTERVAL"], "15s");
}

#[test]
fn test_missing_cloud_controller_link() {
    let err = render(&binding_cache_properties(), &[]).unwrap_err();
    assert_eq!(
        err,
        RenderError::UnsatisfiedLink {
            job: JOB.to_string(),
            name: "cloud_controller".to_string(),
        }
    );
}

#[test]
fn test_missing_required_property() {
    let properties = Properties::from_value(json!({
        "api": { "tls": { "cn": "CN" } },
        "aggregate_drain_certificates": "x",
    }))
    .unwrap();

    let err = render(&properties, &[cloud_controller_link()]).unwrap_err();
    assert!(
        matches!(&err, RenderError::MissingProperty { name, .. } if name == "tls.cn"),
        "got {err:?}"
    );
}

#[test]
fn test_rendering_is_deterministic() {
    let properties = binding_cache_properties();
    let links = [cloud_controller_link()];

    let first = render(&properties, &links).unwrap();
    let second = render(&properties, &links).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_cloud_controller_link_properties_shape_api_url() {
    let link = Link::new("cloud_controller")
        .with_properties(json!({
            "cc": {
                "internal_service_hostname": "cloud-controller-ng.service.cf.internal",
                "tls_port": 9024,
            }
        }))
        .with_instance(LinkInstance::new("a-b-c-d"));

    let rendered = render(&binding_cache_properties(), &[link]).unwrap();
    assert_eq!(
        first_process(&rendered).env["API_URL"],
        "https://cloud-controller-ng.service.cf.internal:9024"
    );
}

#[test]
fn test_cloud_controller_link_without_instances() {
    let rendered = render(&binding_cache_properties(), &[Link::new("cloud_controller")]).unwrap();
    let process = first_process(&rendered);

    assert_eq!(process.env["API_URL"], "https://:9023");
    assert_eq!(process.env["AGGREGATE_DRAIN_CERTIFICATES"], "aggregate_drain_certificates");

    let named = Link::new("cloud_controller").with_properties(json!({
        "cc": { "internal_service_hostname": "cc.internal" }
    }));
    let rendered = render(&binding_cache_properties(), &[named]).unwrap();
    assert_eq!(first_process(&rendered).env["API_URL"], "https://cc.internal:9023");
}

#[test]
fn test_instance_spec_does_not_change_bpm() {
    let template = job().template("config/bpm.yml").unwrap();
    let properties = binding_cache_properties();
    let links = [cloud_controller_link()];

    let default = template.render(&properties, &links).unwrap();
    let other = template
        .render_with(
            &properties,
            &links,
            &RenderOptions::default().with_instance(InstanceSpec {
                index: 3,
                bootstrap: false,
                ..InstanceSpec::default()
            }),
        )
        .unwrap();
    assert_eq!(default, other);
}

#[test]
fn test_certificate_templates_render_verbatim() {
    let pem = "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----";
    let mut props = binding_cache_properties_value();
    props["api"]["tls"]["ca_cert"] = json!(pem);
    let properties = Properties::from_value(props).unwrap();

    let rendered = job()
        .template("config/certs/api_ca.crt")
        .unwrap()
        .render(&properties, &[cloud_controller_link()])
        .unwrap();
    assert_eq!(rendered.trim_end(), pem);

    let err = job()
        .template("config/certs/api_client.key")
        .unwrap()
        .render(&properties, &[cloud_controller_link()])
        .unwrap_err();
    assert_eq!(err, RenderError::missing_property("api.tls.key"));
}
