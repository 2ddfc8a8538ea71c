//! The family of resource manager backends.

use async_trait::async_trait;
use fluxboot_jobspec::JobSpec;
use serde::Deserialize;
use serde::Serialize;

use crate::ArgMapping;
use crate::Argument;
use crate::Config;
use crate::ManagerError;
use crate::Result;
use crate::collect_args;
use crate::process::SubmitOutput;

pub mod cobalt;
pub mod flux;
pub mod lsf;
pub mod slurm;

pub use cobalt::Cobalt;
pub use flux::Flux;
pub use lsf::Lsf;
pub use slurm::Slurm;

/// Represents the kind of a resource manager.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::VariantArray,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ManagerKind {
    /// Already running inside a Flux instance.
    Flux,
    /// IBM Spectrum LSF.
    Lsf,
    /// Slurm.
    Slurm,
    /// Cobalt.
    Cobalt,
}

impl ManagerKind {
    /// Gets the executable whose presence on `PATH` signals this manager.
    ///
    /// Returns `None` for Flux, which is detected by its connection endpoint
    /// instead.
    pub fn program(&self) -> Option<&'static str> {
        match self {
            Self::Flux => None,
            Self::Lsf => Some(lsf::PROGRAM),
            Self::Slurm => Some(slurm::PROGRAM),
            Self::Cobalt => Some(cobalt::PROGRAM),
        }
    }
}

/// Represents the result of a submission.
#[derive(Debug)]
pub enum Submission {
    /// A dry run; the rendered script or command that would be submitted.
    Rendered(String),
    /// The job was submitted.
    Submitted(SubmitOutput),
}

/// A resource manager translating a jobspec into a submission.
#[async_trait]
pub trait ResourceManager: std::fmt::Debug + Send + Sync {
    /// Gets the kind of the resource manager.
    fn kind(&self) -> ManagerKind;

    /// Gets the jobspec being submitted.
    fn jobspec(&self) -> &JobSpec;

    /// Gets the ordered argument mappings of the resource manager.
    fn mappings(&self) -> &'static [ArgMapping] {
        &[]
    }

    /// Translates the jobspec into the resource manager's arguments.
    fn args(&self) -> Result<Vec<Argument>> {
        collect_args(self.jobspec(), self.mappings())
    }

    /// Submits the job.
    ///
    /// When `dry_run` is `true`, the submission is rendered but nothing is
    /// executed.
    async fn submit(&self, _dry_run: bool) -> Result<Submission> {
        Err(ManagerError::NotImplemented(self.kind()))
    }
}

/// Creates the resource manager of the given kind for a jobspec.
pub fn create_manager(
    kind: ManagerKind,
    jobspec: JobSpec,
    config: &Config,
) -> Box<dyn ResourceManager> {
    match kind {
        ManagerKind::Flux => Box::new(Flux::new(jobspec)),
        ManagerKind::Lsf => Box::new(Lsf::new(jobspec)),
        ManagerKind::Slurm => Box::new(Slurm::new(jobspec, config.slurm.clone())),
        ManagerKind::Cobalt => Box::new(Cobalt::new(jobspec)),
    }
}
