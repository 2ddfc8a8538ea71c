//! The Slurm resource manager.
//!
//! In batch mode, the jobspec is translated into `#SBATCH` directives of a
//! generated script which is fed to `sbatch` on standard input. Inside the
//! allocation, the script writes the jobspec to disk and starts a Flux
//! instance across the allocated nodes that submits and attaches to it.
//!
//! In interactive mode, the same arguments are passed to `srun` directly.

use std::fmt::Write as _;

use async_trait::async_trait;
use fluxboot_jobspec::JobSpec;
use tracing::debug;

use super::ManagerKind;
use super::ResourceManager;
use super::Submission;
use crate::ArgMapping;
use crate::Argument;
use crate::ManagerError;
use crate::Result;
use crate::config::SlurmConfig;
use crate::config::SlurmSubmitMode;
use crate::process;

/// The Slurm allocation program, used to detect Slurm.
pub const PROGRAM: &str = "salloc";

/// The prefix of a batch script directive.
const DIRECTIVE: &str = "#SBATCH";

/// The heredoc delimiter for the embedded jobspec.
const JOBSPEC_DELIMITER: &str = "FLUXBOOT_JOBSPEC";

/// The launcher options that keep Slurm from binding the Flux brokers.
const LAUNCH_OPTIONS: [&str; 2] = ["--mpibind=off", "--cpu-bind=none"];

/// The argument mappings for Slurm, in directive order.
const MAPPINGS: &[ArgMapping] = &[
    ArgMapping::new("walltime", map_walltime),
    ArgMapping::new("mincpus_per_node", map_mincpus_per_node),
    ArgMapping::new("nodes", map_nodes),
];

/// Formats a number of seconds as a Slurm `HH:MM:SS` time limit.
///
/// Fractional seconds are truncated and hours are not folded into days.
/// Durations beyond `u64::MAX` seconds saturate to that value.
pub fn seconds_to_walltime(seconds: f64) -> String {
    let total = seconds as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Maps the job duration to a time limit; omitted when no duration is set.
fn map_walltime(jobspec: &JobSpec) -> Result<Option<Argument>> {
    Ok(jobspec
        .duration()
        .filter(|d| *d > 0.0)
        .map(|d| Argument::new(["-t".to_string(), seconds_to_walltime(d)])))
}

/// Maps the cores per node to a minimum CPU count for each node.
///
/// The hint is the total core count divided by the node count, rounded up;
/// it is omitted when the jobspec requests no nodes.
fn map_mincpus_per_node(jobspec: &JobSpec) -> Result<Option<Argument>> {
    let nodes = jobspec.total_nodes()?;
    if nodes == 0 {
        return Ok(None);
    }

    let cores = jobspec.total_cores()?;
    Ok(Some(Argument::new([format!(
        "--mincpus={}",
        cores.div_ceil(nodes)
    )])))
}

/// Maps the node count; omitted when the jobspec requests no nodes.
fn map_nodes(jobspec: &JobSpec) -> Result<Option<Argument>> {
    let nodes = jobspec.total_nodes()?;
    if nodes == 0 {
        return Ok(None);
    }

    Ok(Some(Argument::new(["-N".to_string(), nodes.to_string()])))
}

/// The Slurm resource manager.
#[derive(Debug)]
pub struct Slurm {
    /// The jobspec to submit.
    jobspec: JobSpec,
    /// The configuration of the backend.
    config: SlurmConfig,
}

impl Slurm {
    /// Creates a new Slurm resource manager for a jobspec.
    pub fn new(jobspec: JobSpec, config: SlurmConfig) -> Self {
        Self { jobspec, config }
    }

    /// Gets the shell for the batch script.
    fn shell(&self) -> &str {
        self.jobspec
            .user_shell()
            .unwrap_or(&self.config.default_shell)
    }

    /// Renders the batch script for the given arguments and serialized
    /// jobspec.
    pub fn job_script(&self, args: &[Argument], jobspec: &str) -> Result<String> {
        let mut script = String::new();
        writeln!(&mut script, "#!{shell}", shell = self.shell())?;
        for arg in args {
            writeln!(&mut script, "{DIRECTIVE} {arg}")?;
        }
        for arg in &self.config.extra_args {
            writeln!(&mut script, "{DIRECTIVE} {arg}")?;
        }

        writeln!(
            &mut script,
            "jobspec=\"{dir}/fluxboot-jobspec.${{SLURM_JOB_ID}}.json\"",
            dir = self.config.jobspec_dir.trim_end_matches('/')
        )?;
        writeln!(&mut script, "cat > \"$jobspec\" <<'{JOBSPEC_DELIMITER}'")?;
        writeln!(&mut script, "{jobspec}")?;
        writeln!(&mut script, "{JOBSPEC_DELIMITER}")?;
        writeln!(
            &mut script,
            "{srun} -N ${{SLURM_JOB_NUM_NODES}} -n ${{SLURM_NTASKS}} {options} flux start bash \
             -c \"flux job attach \\$(flux job submit $jobspec)\"",
            srun = self.config.srun,
            options = LAUNCH_OPTIONS.join(" "),
        )?;

        Ok(script)
    }

    /// Builds the `srun` command line that starts Flux and submits the
    /// jobspec without a batch script.
    pub fn interactive_command(&self, args: &[Argument], jobspec: &str) -> Result<Vec<String>> {
        let mut command = vec![self.config.srun.clone()];
        command.extend(LAUNCH_OPTIONS.iter().map(ToString::to_string));
        command.extend(args.iter().flat_map(|a| a.words().iter().cloned()));
        command.extend(self.config.extra_args.iter().cloned());
        command.extend(["flux", "start", "bash", "-c"].map(String::from));
        command.push(format!(
            "flux job attach $(flux job submit <(echo {jobspec}))",
            jobspec = shlex::try_quote(jobspec)?
        ));
        Ok(command)
    }
}

#[async_trait]
impl ResourceManager for Slurm {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Slurm
    }

    fn jobspec(&self) -> &JobSpec {
        &self.jobspec
    }

    fn mappings(&self) -> &'static [ArgMapping] {
        MAPPINGS
    }

    async fn submit(&self, dry_run: bool) -> Result<Submission> {
        let args = self.args()?;
        let jobspec = self.jobspec.dumps()?;
        let timeout = self.config.timeout();

        match self.config.mode {
            SlurmSubmitMode::Batch => {
                let script = self.job_script(&args, &jobspec)?;
                if dry_run {
                    return Ok(Submission::Rendered(script));
                }

                debug!(sbatch = %self.config.sbatch, "submitting batch script");
                let output =
                    process::run(&self.config.sbatch, &[], Some(&script), timeout).await?;
                Ok(Submission::Submitted(output))
            }
            SlurmSubmitMode::Interactive => {
                let command = self.interactive_command(&args, &jobspec)?;
                if dry_run {
                    return Ok(Submission::Rendered(shlex::try_join(
                        command.iter().map(String::as_str),
                    )?));
                }

                let (program, args) = command.split_first().ok_or_else(|| {
                    ManagerError::InvalidConfig("empty interactive command".into())
                })?;
                let output = process::run(program, args, None, timeout).await?;
                Ok(Submission::Submitted(output))
            }
        }
    }
}
