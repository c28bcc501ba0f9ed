//! Compilation step of the sandbox pipeline
//!
//! Writes the submitted source into the workspace and invokes the toolchain
//! under the compile budget. Diagnostics are captured verbatim; the pipeline
//! never runs anything the compiler rejected.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::CompilerConfig;
use crate::sandbox::process::{self, WaitResult};
use crate::toolchain::Toolchain;
use crate::workspace::{Workspace, WorkspaceError};

/// Errors from the sandbox's side of compilation
///
/// An untrusted program that fails to compile is not an error; that is
/// [`CompilePhase::Rejected`]. These are host faults.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error("failed to invoke compiler: {0}")]
    Invoke(#[from] std::io::Error),
}

/// Result of one compile attempt
#[derive(Debug)]
pub enum CompilePhase {
    /// The toolchain produced an artifact
    Succeeded { elapsed: Duration },

    /// The toolchain exited non-zero; stderr captured verbatim
    Rejected {
        diagnostics: String,
        elapsed: Duration,
    },

    /// The compile budget expired and the compiler group was killed
    TimedOut { elapsed: Duration },
}

/// Compile submitted source inside a workspace
///
/// The source lands verbatim in the configured fixed filename; the fixed name
/// is safe because the workspace is exclusive to this request. The compiler
/// runs with the workspace as its working directory and no stdin.
#[instrument(skip_all, fields(workspace = %workspace.path().display()))]
pub async fn compile(
    workspace: &Workspace,
    compiler: &CompilerConfig,
    toolchain: &Toolchain,
    source: &str,
    budget: Duration,
) -> Result<CompilePhase, CompileError> {
    workspace
        .write_file(&compiler.source_name, source.as_bytes())
        .await?;

    let source_path = workspace.file_path(&compiler.source_name)?;
    let artifact_path = workspace.file_path(&compiler.artifact_name)?;
    let args = compiler.expand_args(
        &source_path.to_string_lossy(),
        &artifact_path.to_string_lossy(),
    );

    debug!(compiler = %toolchain.path.display(), ?args, "invoking compiler");

    let result =
        process::run_bounded(&toolchain.path, &args, workspace.path(), None, budget).await?;

    match result {
        WaitResult::TimedOut { elapsed } => {
            debug!(
                elapsed_ms = elapsed.as_millis() as u64,
                "compile budget expired"
            );
            Ok(CompilePhase::TimedOut { elapsed })
        }
        WaitResult::Finished(captured) => {
            let elapsed = captured.elapsed;
            if captured.status.success() {
                debug!(elapsed_ms = elapsed.as_millis() as u64, "compile succeeded");
                Ok(CompilePhase::Succeeded { elapsed })
            } else {
                let diagnostics = String::from_utf8_lossy(&captured.stderr).into_owned();
                debug!(
                    code = captured.status.code(),
                    diagnostics_len = diagnostics.len(),
                    "compile rejected source"
                );
                Ok(CompilePhase::Rejected {
                    diagnostics,
                    elapsed,
                })
            }
        }
    }
}
