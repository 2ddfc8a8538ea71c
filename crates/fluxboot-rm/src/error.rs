//! Errors raised while selecting a resource manager or submitting to it.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use fluxboot_jobspec::JobSpecError;

use crate::ManagerKind;

/// The exit code used when an error has no more specific code.
const DEFAULT_EXIT_CODE: i32 = 1;

/// Represents an error from a resource manager.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    /// The jobspec was invalid.
    #[error(transparent)]
    JobSpec(#[from] JobSpecError),

    /// No resource manager could be found on this host.
    #[error("unable to find a resource manager on this system")]
    NoResourceManagerDetected,

    /// The selected resource manager does not support submission yet.
    #[error("submission to `{0}` is not implemented")]
    NotImplemented(ManagerKind),

    /// The configuration was invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An argument could not be quoted for the shell.
    #[error("failed to quote argument: {0}")]
    Quote(#[from] shlex::QuoteError),

    /// A submission script could not be rendered.
    #[error("failed to render submission script: {0}")]
    Format(#[from] std::fmt::Error),

    /// The submission program could not be spawned.
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        /// The program that failed to spawn.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The submission program exited unsuccessfully.
    #[error("`{program}` failed with {status}: {stderr}")]
    SubmissionFailed {
        /// The submission program.
        program: String,
        /// The exit status of the program.
        status: ExitStatus,
        /// The captured standard error of the program.
        stderr: String,
    },

    /// The submission program did not exit in time.
    #[error("`{program}` did not exit within {timeout:?}")]
    Timeout {
        /// The submission program.
        program: String,
        /// The configured timeout.
        timeout: Duration,
    },

    /// An I/O error occurred while communicating with the submission program.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ManagerError {
    /// Gets the process exit code that best describes the error.
    ///
    /// OS-level failures use the underlying OS error code and failed
    /// submissions use the submission program's exit code; everything else
    /// exits with `1`.
    pub fn exit_code(&self) -> i32 {
        let code = match self {
            Self::Spawn { source, .. } | Self::Io(source) => source.raw_os_error(),
            Self::SubmissionFailed { status, .. } => status.code(),
            _ => None,
        };

        code.filter(|c| *c != 0).unwrap_or(DEFAULT_EXIT_CODE)
    }
}

/// Result type for resource manager operations.
pub type Result<T> = std::result::Result<T, ManagerError>;
