//! Template context construction.

use tera::Context as TeraContext;

use crate::job::InstanceSpec;

/// Build the context for one render. Templates see a single variable, `spec`,
/// describing the instance (with `spec.job.name` set to the job being rendered).
/// Properties and links are reached through functions, not variables.
pub fn build_context(instance: &InstanceSpec, job_name: &str) -> TeraContext {
    let mut context = TeraContext::new();
    context.insert("spec", &instance.to_template_value(job_name));
    context
}
