//! Constants shared across the crate: release layout, configuration lookup and the
//! defaults used for instance and link-instance fields that callers leave unset.

/// Directory under the release root holding one directory per job.
pub const JOBS_DIR: &str = "jobs";

/// Job spec file name inside a job directory.
pub const SPEC_FILE: &str = "spec";

/// Directory inside a job holding template sources.
pub const TEMPLATES_DIR: &str = "templates";

/// Destination of the process-manager config within a job.
pub const BPM_DESTINATION: &str = "config/bpm.yml";

/// Environment variable naming the tool configuration file.
pub const CONFIG_ENV_VAR: &str = "RELEASE_TEMPLATES_CONFIG";

/// Directory under the platform config dir holding `config.toml`.
pub const CONFIG_DIR_NAME: &str = "release-templates";

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Defaults for the instance a template is rendered for.
pub mod instance {
    pub const NAME: &str = "me";
    pub const ID: &str = "xxxxxx-xxxxxxxx-xxxxx";
    pub const AZ: &str = "az1";
    pub const ADDRESS: &str = "my.bosh.com";
    pub const IP: &str = "192.168.0.0";
    pub const DEPLOYMENT: &str = "my-deployment";
}

/// Defaults for instances behind a consumed link.
pub mod link_instance {
    pub const NAME: &str = "jobname";
    pub const AZ: &str = "az1";
    pub const ADDRESS: &str = "link.instance.address.com";
}
