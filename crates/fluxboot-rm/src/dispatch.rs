//! Dispatch of a jobspec to the resource manager on the host.

use fluxboot_jobspec::JobSpec;
use tracing::debug;
use tracing::info;

use crate::Config;
use crate::Result;
use crate::Submission;
use crate::create_manager;
use crate::detect_manager;

/// Parses and validates a jobspec, selects a resource manager, and submits
/// the jobspec to it.
///
/// The resource manager is taken from the configuration if set and detected
/// from the host otherwise. Submission is attempted exactly once.
pub async fn dispatch(jobspec: &str, dry_run: bool, config: &Config) -> Result<Submission> {
    config.validate()?;

    let jobspec = JobSpec::parse(jobspec)?;
    jobspec.validate()?;

    let kind = match config.kind {
        Some(kind) => {
            debug!(%kind, "using configured resource manager");
            kind
        }
        None => detect_manager()?,
    };

    info!(%kind, dry_run, "submitting jobspec");
    create_manager(kind, jobspec, config).submit(dry_run).await
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ManagerError;
    use crate::ManagerKind;

    /// A single-line jobspec for two tasks on one node.
    const JOBSPEC: &str = r#"{"version":1,"resources":[{"type":"node","count":1,"with":[{"type":"slot","count":2,"label":"task","with":[{"type":"core","count":1}]}]}],"tasks":[{"command":["hostname"],"slot":"task","count":{"per_slot":1}}],"attributes":{"system":{"duration":60}}}"#;

    fn config(kind: ManagerKind) -> Config {
        Config {
            kind: Some(kind),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn slurm_dry_run() {
        match dispatch(JOBSPEC, true, &config(ManagerKind::Slurm))
            .await
            .unwrap()
        {
            Submission::Rendered(script) => {
                assert!(script.contains("#SBATCH -t 00:01:00\n"));
                assert!(script.contains("#SBATCH -N 1\n"));
                assert!(script.contains(r#""command":["hostname"]"#));
            }
            other => panic!("unexpected submission: {other:?}"),
        }
    }

    #[tokio::test]
    async fn not_implemented() {
        assert!(matches!(
            dispatch(JOBSPEC, true, &config(ManagerKind::Cobalt)).await,
            Err(ManagerError::NotImplemented(ManagerKind::Cobalt))
        ));
    }

    #[tokio::test]
    async fn invalid_jobspec() {
        assert!(matches!(
            dispatch("resources: [", true, &config(ManagerKind::Slurm)).await,
            Err(ManagerError::JobSpec(_))
        ));
        assert!(matches!(
            dispatch(
                &JOBSPEC.replace(r#""slot":"task""#, r#""slot":"gpu""#),
                true,
                &config(ManagerKind::Slurm)
            )
            .await,
            Err(ManagerError::JobSpec(_))
        ));
    }

    #[tokio::test]
    async fn invalid_config() {
        let mut config = config(ManagerKind::Slurm);
        config.slurm.srun.clear();
        assert!(matches!(
            dispatch(JOBSPEC, true, &config).await,
            Err(ManagerError::InvalidConfig(_))
        ));
    }
}
