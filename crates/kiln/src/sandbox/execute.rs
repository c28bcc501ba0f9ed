//! Execution step of the sandbox pipeline
//!
//! Runs the freshly compiled artifact with the workspace as its working
//! directory, so every file the untrusted program creates dies with the
//! workspace. Output is captured exactly as produced; the exit code is data,
//! never interpreted.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::sandbox::process::{self, WaitResult};
use crate::workspace::{Workspace, WorkspaceError};

/// Errors from the sandbox's side of running the artifact
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error("failed to invoke artifact: {0}")]
    Invoke(#[from] std::io::Error),
}

/// Result of one run attempt
#[derive(Debug)]
pub enum RunPhase {
    /// The program terminated on its own, with whatever exit code
    Finished {
        stdout: String,
        stderr: String,
        exit_code: i32,
        elapsed: Duration,
    },

    /// The run budget expired and the process group was killed
    ///
    /// Partial output is discarded; a timeout never masquerades as a result.
    TimedOut,
}

/// Run the compiled artifact inside its workspace
///
/// `stdin` is piped in when present; when absent the program gets the null
/// device, so a blocking read sees immediate end-of-input rather than
/// hanging. Invalid UTF-8 in the captured streams is replaced lossily.
#[instrument(skip_all, fields(workspace = %workspace.path().display()))]
pub async fn execute(
    workspace: &Workspace,
    artifact_name: &str,
    stdin: Option<&str>,
    budget: Duration,
) -> Result<RunPhase, ExecuteError> {
    let artifact = workspace.file_path(artifact_name)?;

    debug!(artifact = %artifact.display(), has_stdin = stdin.is_some(), "running artifact");

    let result = process::run_bounded(
        &artifact,
        &[],
        workspace.path(),
        stdin.map(str::as_bytes),
        budget,
    )
    .await?;

    match result {
        WaitResult::TimedOut { elapsed } => {
            debug!(
                elapsed_ms = elapsed.as_millis() as u64,
                "run budget expired"
            );
            Ok(RunPhase::TimedOut)
        }
        WaitResult::Finished(captured) => {
            let exit_code = exit_code_of(&captured.status);
            debug!(
                exit_code,
                elapsed_ms = captured.elapsed.as_millis() as u64,
                stdout_len = captured.stdout.len(),
                stderr_len = captured.stderr.len(),
                "run finished"
            );
            Ok(RunPhase::Finished {
                stdout: String::from_utf8_lossy(&captured.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&captured.stderr).into_owned(),
                exit_code,
                elapsed: captured.elapsed,
            })
        }
    }
}

/// Numeric exit code; death by signal N reports -N
fn exit_code_of(status: &std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    -1
}
