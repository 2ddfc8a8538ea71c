//! The IBM Spectrum LSF resource manager.
//!
//! No arguments are mapped for LSF yet, so submission is not implemented.

use fluxboot_jobspec::JobSpec;

use super::ManagerKind;
use super::ResourceManager;

/// The LSF submission program, used to detect LSF.
pub const PROGRAM: &str = "bsub";

/// The LSF resource manager.
#[derive(Debug)]
pub struct Lsf {
    /// The jobspec to submit.
    jobspec: JobSpec,
}

impl Lsf {
    /// Creates a new LSF resource manager for a jobspec.
    pub fn new(jobspec: JobSpec) -> Self {
        Self { jobspec }
    }
}

impl ResourceManager for Lsf {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Lsf
    }

    fn jobspec(&self) -> &JobSpec {
        &self.jobspec
    }
}
