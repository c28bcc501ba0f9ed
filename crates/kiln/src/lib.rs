//! A library for sandboxed compilation and execution of untrusted C code.
//!
//! Kiln accepts arbitrary learner-submitted source text, compiles it with an
//! external toolchain, runs the resulting binary under strict wall-clock
//! budgets, and reports exactly what happened as one structured outcome.
//!
//! # Features
//!
//! - **Per-request isolation** — every submission compiles and runs in its own
//!   uniquely named workspace directory, deleted on every exit path.
//! - **Bounded execution** — compile and run phases each carry a wall-clock
//!   budget; on expiry the whole process group is killed and reaped.
//! - **Exact capture** — stdout, stderr, and the exit code are reported as
//!   produced; a non-zero exit is data, not an error.
//! - **Toolchain gate** — the compiler is probed before any workspace I/O,
//!   with a positive result cached for the life of the process.
//! - **TOML configuration** — budgets, the compiler command template, and the
//!   workspace root are all configurable.

pub use config::{CompilerConfig, Config, ConfigError};
pub use sandbox::{
    CompileError, CompilePhase, ExecuteError, RunPhase, Sandbox, SandboxError, SubmitRequest,
};
pub use toolchain::{Toolchain, ToolchainStatus, install_hint, probe};
pub use types::{Limits, Outcome, Phase, RunReport};
pub use workspace::{Workspace, WorkspaceError};

pub mod config;
pub mod sandbox;
pub mod toolchain;
pub mod types;
pub mod workspace;
