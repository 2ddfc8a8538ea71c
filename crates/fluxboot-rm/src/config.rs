//! Configuration of resource manager backends.

use serde::Deserialize;
use serde::Serialize;

use crate::ManagerError;
use crate::ManagerKind;
use crate::Result;

/// Represents how the Slurm backend submits a job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlurmSubmitMode {
    /// Render a batch script and feed it to `sbatch` on standard input.
    #[default]
    Batch,
    /// Run `srun` directly with the mapped arguments.
    Interactive,
}

/// Configuration for the Slurm backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields, default)]
pub struct SlurmConfig {
    /// The shell for the batch script when the jobspec does not request one.
    ///
    /// By default, this is `/bin/sh`.
    pub default_shell: String,
    /// The batch submission program.
    ///
    /// By default, this is `sbatch`.
    pub sbatch: String,
    /// The launcher used within the allocation and for interactive
    /// submission.
    ///
    /// By default, this is `srun`.
    pub srun: String,
    /// How jobs are submitted.
    pub mode: SlurmSubmitMode,
    /// The directory where the allocation writes the jobspec before launching
    /// it.
    ///
    /// By default, this is `/tmp`.
    pub jobspec_dir: String,
    /// Additional arguments appended after the mapped arguments.
    pub extra_args: Vec<String>,
    /// The number of seconds to wait for the submission program to exit.
    ///
    /// By default, there is no timeout.
    pub timeout_secs: Option<u64>,
}

impl Default for SlurmConfig {
    fn default() -> Self {
        Self {
            default_shell: "/bin/sh".to_string(),
            sbatch: "sbatch".to_string(),
            srun: "srun".to_string(),
            mode: SlurmSubmitMode::default(),
            jobspec_dir: "/tmp".to_string(),
            extra_args: Vec::new(),
            timeout_secs: None,
        }
    }
}

impl SlurmConfig {
    /// Validates the Slurm configuration.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("default_shell", &self.default_shell),
            ("sbatch", &self.sbatch),
            ("srun", &self.srun),
            ("jobspec_dir", &self.jobspec_dir),
        ] {
            if value.is_empty() {
                return Err(ManagerError::InvalidConfig(format!(
                    "slurm `{name}` cannot be empty"
                )));
            }
        }

        if self.timeout_secs == Some(0) {
            return Err(ManagerError::InvalidConfig(
                "slurm `timeout_secs` must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    /// Gets the submission timeout, if one is configured.
    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.timeout_secs.map(std::time::Duration::from_secs)
    }
}

/// Configuration for resource manager selection and the backends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields, default)]
pub struct Config {
    /// The resource manager to use.
    ///
    /// If `None`, the resource manager is detected from the host environment.
    pub kind: Option<ManagerKind>,
    /// The configuration of the Slurm backend.
    pub slurm: SlurmConfig,
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.slurm.validate()
    }
}
