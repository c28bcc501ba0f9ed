use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Wall-clock budgets for the sandbox phases, in fractional seconds.
///
/// Budgets must be positive and finite; `Config::validate` enforces this
/// before a `Limits` reaches the sandbox.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    /// Compile phase budget in seconds
    #[serde(default = "default_compile_timeout")]
    pub compile_timeout: f64,

    /// Run phase budget in seconds, measured from process start
    #[serde(default = "default_run_timeout")]
    pub run_timeout: f64,

    /// Toolchain probe budget in seconds
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout: f64,
}

impl Limits {
    /// Create limits with the default budgets
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the compile budget in seconds
    pub fn with_compile_timeout(mut self, seconds: f64) -> Self {
        self.compile_timeout = seconds;
        self
    }

    /// Set the run budget in seconds
    pub fn with_run_timeout(mut self, seconds: f64) -> Self {
        self.run_timeout = seconds;
        self
    }

    /// Set the probe budget in seconds
    pub fn with_probe_timeout(mut self, seconds: f64) -> Self {
        self.probe_timeout = seconds;
        self
    }

    /// Compile budget as a `Duration`
    pub fn compile_budget(&self) -> Duration {
        Duration::from_secs_f64(self.compile_timeout)
    }

    /// Run budget as a `Duration`
    pub fn run_budget(&self) -> Duration {
        Duration::from_secs_f64(self.run_timeout)
    }

    /// Probe budget as a `Duration`
    pub fn probe_budget(&self) -> Duration {
        Duration::from_secs_f64(self.probe_timeout)
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            compile_timeout: default_compile_timeout(),
            run_timeout: default_run_timeout(),
            probe_timeout: default_probe_timeout(),
        }
    }
}

fn default_compile_timeout() -> f64 {
    10.0
}

fn default_run_timeout() -> f64 {
    5.0
}

fn default_probe_timeout() -> f64 {
    2.0
}

/// Pipeline phase a timeout was tripped in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Compile,
    Run,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Compile => write!(f, "compile"),
            Phase::Run => write!(f, "run"),
        }
    }
}

/// Captured result of a submission that compiled and ran to termination
///
/// A non-zero exit code is data, not an error: the sandbox reports what the
/// program did without interpreting it.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Everything the program wrote to stdout, exactly as produced
    pub stdout: String,

    /// Everything the program wrote to stderr, exactly as produced
    pub stderr: String,

    /// Numeric exit code; negative signal number if killed by a signal
    pub exit_code: i32,

    /// Wall-clock time spent compiling
    pub compile_elapsed: Duration,

    /// Wall-clock time spent running
    pub run_elapsed: Duration,
}

impl RunReport {
    /// Check whether the program itself exited with code 0
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Result of one trip through the sandbox pipeline
///
/// Exactly one variant describes each submission; a compile failure never
/// carries runtime output and a timeout never carries partial output.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// No responsive compiler was found on the host
    ToolchainMissing,

    /// The toolchain rejected the source; diagnostics captured verbatim
    CompileFailed {
        diagnostics: String,
        elapsed: Duration,
    },

    /// A phase exceeded its wall-clock budget and the process group was killed
    TimedOut { phase: Phase },

    /// The submission compiled and ran to termination
    Completed(RunReport),
}

impl Outcome {
    /// Check whether the submission produced a runtime result
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    /// Short discriminant name for logging
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::ToolchainMissing => "toolchain-missing",
            Outcome::CompileFailed { .. } => "compile-failed",
            Outcome::TimedOut {
                phase: Phase::Compile,
            } => "compile-timeout",
            Outcome::TimedOut { phase: Phase::Run } => "run-timeout",
            Outcome::Completed(_) => "completed",
        }
    }
}
