//! Implementation of the bootstrap command.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use fluxboot_rm::ManagerKind;
use fluxboot_rm::Submission;
use tracing::info;

use crate::config::Config;
use crate::input::STDIN_PATH;
use crate::input::read_jobspec;

/// Arguments for the bootstrap command.
#[derive(Parser, Debug)]
pub struct BootstrapArgs {
    /// The path to the jobspec, or `-` to read it from standard input.
    ///
    /// Only the first line is read, so the jobspec must be encoded on a single
    /// line.
    #[arg(value_name = "JOBSPEC", default_value = STDIN_PATH)]
    pub jobspec: PathBuf,

    /// Prints what would be submitted instead of submitting it.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// The resource manager to submit to, skipping detection.
    #[arg(long, value_name = "KIND")]
    pub manager: Option<ManagerKind>,
}

/// Writes a submission result to `out`.
fn report(submission: &Submission, mut out: impl Write) -> Result<()> {
    match submission {
        Submission::Rendered(text) => {
            out.write_all(text.as_bytes())?;
            if !text.ends_with('\n') {
                writeln!(out)?;
            }
        }
        Submission::Submitted(output) => out.write_all(output.stdout.as_bytes())?,
    }

    Ok(())
}

/// Bootstraps a Flux instance for the jobspec.
pub async fn bootstrap(args: BootstrapArgs, config: Config) -> Result<()> {
    let jobspec = read_jobspec(&args.jobspec)?;
    let config = config.manager_for(args.manager);

    let submission = fluxboot_rm::dispatch(&jobspec, args.dry_run, &config)
        .await
        .with_context(|| {
            format!(
                "failed to bootstrap jobspec `{path}`",
                path = args.jobspec.display()
            )
        })?;

    if let Submission::Submitted(output) = &submission {
        info!(status = %output.status, "submission completed");
    }

    report(&submission, std::io::stdout().lock())
}
