//! Spawning of resource manager submission programs.

use std::io::ErrorKind;
use std::process::ExitStatus;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::ManagerError;
use crate::Result;

/// The captured output of a successful submission.
#[derive(Debug, Clone)]
pub struct SubmitOutput {
    /// The exit status of the submission program.
    pub status: ExitStatus,
    /// The standard output of the submission program.
    pub stdout: String,
    /// The standard error of the submission program.
    pub stderr: String,
}

/// Runs a submission program to completion.
///
/// If `input` is given it is written to the program's standard input, which
/// is then closed. Both output streams are drained while waiting, so a chatty
/// program cannot block on a full pipe.
///
/// Non-empty standard error is reported as a warning and non-empty standard
/// output as information. A non-zero exit status is an error carrying the
/// captured standard error. With no `timeout` the wait is unbounded; on
/// timeout the program is killed.
pub async fn run(
    program: &str,
    args: &[String],
    input: Option<&str>,
    timeout: Option<Duration>,
) -> Result<SubmitOutput> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(?command, "spawning submission command");

    let mut child = command.spawn().map_err(|source| ManagerError::Spawn {
        program: program.to_string(),
        source,
    })?;

    // Feed standard input from a separate task so that a program which writes
    // before it reads cannot deadlock against us.
    let writer = match (child.stdin.take(), input) {
        (Some(mut stdin), Some(input)) => {
            let input = input.to_string();
            Some(tokio::spawn(async move {
                stdin.write_all(input.as_bytes()).await?;
                stdin.shutdown().await
            }))
        }
        _ => None,
    };

    let output = match timeout {
        Some(timeout) => tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| ManagerError::Timeout {
                program: program.to_string(),
                timeout,
            })??,
        None => child.wait_with_output().await?,
    };

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    if !stderr.trim().is_empty() {
        warn!(program, stderr = stderr.trim_end(), "submission reported errors");
    }
    if !stdout.trim().is_empty() {
        info!(program, stdout = stdout.trim_end(), "submission output");
    }

    if !output.status.success() {
        return Err(ManagerError::SubmissionFailed {
            program: program.to_string(),
            status: output.status,
            stderr: stderr.trim_end().to_string(),
        });
    }

    // A program that exits successfully without reading all of its input has
    // still accepted the job.
    if let Some(writer) = writer {
        match writer
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))?
        {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                debug!(program, "submission program closed its input early");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(SubmitOutput {
        status: output.status,
        stdout,
        stderr,
    })
}

#[cfg(all(test, unix))]
mod test {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    /// Writes an executable shell script into the directory.
    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn feeds_input() {
        let output = run("cat", &[], Some("#!/bin/sh\necho hi\n"), None)
            .await
            .unwrap();
        assert!(output.status.success());
        assert_eq!(output.stdout, "#!/bin/sh\necho hi\n");
        assert_eq!(output.stderr, "");
    }

    #[tokio::test]
    async fn passes_arguments() {
        let output = run("echo", &["-N".to_string(), "2".to_string()], None, None)
            .await
            .unwrap();
        assert_eq!(output.stdout, "-N 2\n");
    }

    #[tokio::test]
    async fn failure_carries_stderr() {
        let dir = TempDir::new().unwrap();
        let program = script(dir.path(), "submit", "cat >/dev/null\necho 'bad partition' >&2\nexit 3");
        match run(program.to_str().unwrap(), &[], Some("script"), None).await {
            Err(ManagerError::SubmissionFailed { status, stderr, .. }) => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "bad partition");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn stderr_alone_is_not_failure() {
        let dir = TempDir::new().unwrap();
        let program = script(
            dir.path(),
            "submit",
            "cat >/dev/null\necho 'warning: deprecated' >&2\necho 'Submitted batch job 42'",
        );
        let output = run(program.to_str().unwrap(), &[], Some("script"), None)
            .await
            .unwrap();
        assert_eq!(output.stdout.trim(), "Submitted batch job 42");
        assert_eq!(output.stderr.trim(), "warning: deprecated");
    }

    #[tokio::test]
    async fn unread_input_is_not_failure() {
        let input = "x".repeat(1 << 20);
        let output = run("true", &[], Some(&input), None).await.unwrap();
        assert!(output.status.success());
        assert_eq!(output.stdout, "");
    }

    #[tokio::test]
    async fn unread_input_with_failure() {
        let input = "x".repeat(1 << 20);
        assert!(matches!(
            run("false", &[], Some(&input), None).await,
            Err(ManagerError::SubmissionFailed { .. })
        ));
    }

    #[tokio::test]
    async fn drains_large_output() {
        let dir = TempDir::new().unwrap();
        let program = script(
            dir.path(),
            "submit",
            "i=0\nwhile [ $i -lt 20000 ]; do echo \"line $i\"; echo \"err $i\" >&2; i=$((i+1)); done",
        );
        let output = run(program.to_str().unwrap(), &[], None, None)
            .await
            .unwrap();
        assert_eq!(output.stdout.lines().count(), 20000);
        assert_eq!(output.stderr.lines().count(), 20000);
    }

    #[tokio::test]
    async fn missing_program() {
        let err = run("/nonexistent/sbatch", &[], None, None).await.unwrap_err();
        assert!(matches!(err, ManagerError::Spawn { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn times_out() {
        let err = run(
            "sleep",
            &["5".to_string()],
            None,
            Some(Duration::from_millis(100)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ManagerError::Timeout { .. }));
    }
}
