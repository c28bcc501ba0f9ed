//! The compile-and-execute pipeline
//!
//! [`Sandbox`] ties the phases together: toolchain gate, workspace
//! acquisition, compile, run, and unconditional workspace release. Each
//! submission is fully independent; the only state shared across submissions
//! is the cached result of a successful toolchain probe.

use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{info, instrument, warn};

pub use crate::sandbox::compile::{CompileError, CompilePhase, compile};
pub use crate::sandbox::execute::{ExecuteError, RunPhase, execute};

pub mod process;

mod compile;
mod execute;

use crate::config::Config;
use crate::toolchain::{self, Toolchain, ToolchainStatus};
use crate::types::{Outcome, Phase, RunReport};
use crate::workspace::{Workspace, WorkspaceError};

/// One submission of untrusted source
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    /// Source text, compiled verbatim
    pub source: String,

    /// Data piped to the running program's stdin; `None` means the null
    /// device (immediate end-of-input, not a hang)
    pub stdin: Option<String>,
}

/// Host-side faults of the sandbox itself
///
/// Never used for anything the untrusted program did: a compile rejection, a
/// non-zero exit, or a tripped timeout are all [`Outcome`] variants, not
/// errors.
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("source is empty")]
    EmptySource,

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Execute(#[from] ExecuteError),
}

/// Sandbox for compiling and running untrusted C source
///
/// Cheap to share behind an `Arc`; submissions run concurrently without
/// interfering, each inside its own [`Workspace`].
#[derive(Debug)]
pub struct Sandbox {
    config: Config,
    toolchain: OnceCell<Toolchain>,
}

impl Sandbox {
    /// Create a sandbox with the given configuration
    pub fn new(config: Config) -> Self {
        Self {
            config,
            toolchain: OnceCell::new(),
        }
    }

    /// Create a sandbox with the default configuration
    pub fn with_defaults() -> Self {
        Self::new(Config::default())
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Probe for the toolchain, caching a positive answer
    ///
    /// Only success is cached: a host that is missing its compiler re-probes
    /// on every call, so installing one does not require a restart.
    pub async fn toolchain_status(&self) -> ToolchainStatus {
        if let Some(toolchain) = self.toolchain.get() {
            return ToolchainStatus::Available(toolchain.clone());
        }

        match toolchain::probe(&self.config.compiler, self.config.limits.probe_budget()).await {
            ToolchainStatus::Available(found) => {
                let cached = self
                    .toolchain
                    .get_or_init(|| async move { found })
                    .await
                    .clone();
                ToolchainStatus::Available(cached)
            }
            ToolchainStatus::Missing => ToolchainStatus::Missing,
        }
    }

    /// Compile and run one submission
    ///
    /// Exactly one [`Outcome`] variant describes what happened; errors are
    /// reserved for faults of the host. The toolchain gate runs before any
    /// workspace I/O, and the workspace is released on every exit path.
    #[instrument(skip_all, fields(source_len = request.source.len()))]
    pub async fn submit(&self, request: SubmitRequest) -> Result<Outcome, SandboxError> {
        if request.source.trim().is_empty() {
            return Err(SandboxError::EmptySource);
        }

        let toolchain = match self.toolchain_status().await {
            ToolchainStatus::Available(toolchain) => toolchain,
            ToolchainStatus::Missing => {
                info!(outcome = "toolchain-missing", "submission rejected");
                return Ok(Outcome::ToolchainMissing);
            }
        };

        let workspace = Workspace::create(self.config.workspace_base()).await?;
        let outcome = self.run_pipeline(&workspace, &toolchain, &request).await;

        // Release errors must not mask the pipeline result; the Drop
        // backstop retries the delete either way
        if let Err(e) = workspace.release().await {
            warn!(error = %e, "workspace release failed");
        }

        if let Ok(ref outcome) = outcome {
            info!(outcome = outcome.label(), "submission finished");
        }
        outcome
    }

    async fn run_pipeline(
        &self,
        workspace: &Workspace,
        toolchain: &Toolchain,
        request: &SubmitRequest,
    ) -> Result<Outcome, SandboxError> {
        let compile_elapsed = match compile(
            workspace,
            &self.config.compiler,
            toolchain,
            &request.source,
            self.config.limits.compile_budget(),
        )
        .await?
        {
            CompilePhase::TimedOut { .. } => {
                return Ok(Outcome::TimedOut {
                    phase: Phase::Compile,
                });
            }
            CompilePhase::Rejected {
                diagnostics,
                elapsed,
            } => {
                return Ok(Outcome::CompileFailed {
                    diagnostics,
                    elapsed,
                });
            }
            CompilePhase::Succeeded { elapsed } => elapsed,
        };

        match execute(
            workspace,
            &self.config.compiler.artifact_name,
            request.stdin.as_deref(),
            self.config.limits.run_budget(),
        )
        .await?
        {
            RunPhase::TimedOut => Ok(Outcome::TimedOut { phase: Phase::Run }),
            RunPhase::Finished {
                stdout,
                stderr,
                exit_code,
                elapsed,
            } => Ok(Outcome::Completed(RunReport {
                stdout,
                stderr,
                exit_code,
                compile_elapsed,
                run_elapsed: elapsed,
            })),
        }
    }
}
