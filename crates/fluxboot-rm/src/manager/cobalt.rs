//! The Cobalt resource manager.
//!
//! No arguments are mapped for Cobalt yet, so submission is not implemented.

use fluxboot_jobspec::JobSpec;

use super::ManagerKind;
use super::ResourceManager;

/// The Cobalt submission program, used to detect Cobalt.
pub const PROGRAM: &str = "cqsub";

/// The Cobalt resource manager.
#[derive(Debug)]
pub struct Cobalt {
    /// The jobspec to submit.
    jobspec: JobSpec,
}

impl Cobalt {
    /// Creates a new Cobalt resource manager for a jobspec.
    pub fn new(jobspec: JobSpec) -> Self {
        Self { jobspec }
    }
}

impl ResourceManager for Cobalt {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Cobalt
    }

    fn jobspec(&self) -> &JobSpec {
        &self.jobspec
    }
}
