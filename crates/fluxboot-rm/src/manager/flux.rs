//! The native mode, used when already running inside a Flux instance.

use fluxboot_jobspec::JobSpec;

use super::ManagerKind;
use super::ResourceManager;

/// The environment variable holding the URI of an enclosing Flux instance.
pub const FLUX_URI_ENV: &str = "FLUX_URI";

/// The native Flux resource manager.
#[derive(Debug)]
pub struct Flux {
    /// The jobspec to submit.
    jobspec: JobSpec,
}

impl Flux {
    /// Creates a new native resource manager for a jobspec.
    pub fn new(jobspec: JobSpec) -> Self {
        Self { jobspec }
    }
}

impl ResourceManager for Flux {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Flux
    }

    fn jobspec(&self) -> &JobSpec {
        &self.jobspec
    }
}
