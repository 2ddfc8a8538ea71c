//! Translation of jobspecs into submissions for cluster resource managers.
//!
//! A [`ResourceManager`] owns a [`JobSpec`](fluxboot_jobspec::JobSpec) and
//! translates it into manager-specific arguments through an ordered table of
//! [`ArgMapping`]s, then submits it. The resource manager for the host is
//! found with [`detect_manager`], and [`dispatch`] runs the whole pipeline
//! from jobspec text to submission.
//!
//! Slurm is the only manager with a complete translation. LSF, Cobalt, and
//! the native Flux mode are recognized but fail to submit with
//! [`ManagerError::NotImplemented`].

mod args;
pub mod config;
mod detect;
mod dispatch;
mod error;
pub mod manager;
pub mod process;

pub use args::*;
pub use config::Config;
pub use detect::*;
pub use dispatch::*;
pub use error::*;
pub use manager::ManagerKind;
pub use manager::ResourceManager;
pub use manager::Submission;
pub use manager::create_manager;
