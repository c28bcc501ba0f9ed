//! Toolchain discovery
//!
//! Resolves the configured compiler against PATH and probes it with a short
//! `--version` invocation. The probe runs before any workspace I/O so a host
//! without a compiler fails fast instead of churning the filesystem.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::CompilerConfig;

/// A compiler that answered the probe
#[derive(Debug, Clone, PartialEq)]
pub struct Toolchain {
    /// Resolved absolute path to the compiler
    pub path: PathBuf,

    /// First line of the compiler's `--version` output
    pub version: String,
}

/// Result of probing for the configured compiler
#[derive(Debug, Clone, PartialEq)]
pub enum ToolchainStatus {
    /// The compiler resolved and answered `--version` within the budget
    Available(Toolchain),

    /// No compiler, or one that did not respond in time
    Missing,
}

impl ToolchainStatus {
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, ToolchainStatus::Available(_))
    }
}

/// Platform-specific installation hint shown when no compiler is found
pub fn install_hint() -> &'static str {
    if cfg!(target_os = "windows") {
        "Windows: download MinGW-w64 from mingw-w64.org or run: choco install mingw"
    } else if cfg!(target_os = "macos") {
        "macOS: run: xcode-select --install (or: brew install gcc)"
    } else {
        "Linux: install gcc with your package manager, e.g.: sudo apt install gcc"
    }
}

/// Resolve a bare command name to a full path using the host's PATH
///
/// Commands that already contain a path separator (like `./cc` or
/// `/usr/bin/gcc`) are used as-is; symlinks are resolved so the path the
/// sandbox spawns is the real binary.
fn resolve_command(command: &str) -> Option<PathBuf> {
    if command.contains(['/', '\\']) {
        return Some(PathBuf::from(command));
    }

    let path_var = std::env::var_os("PATH").unwrap_or_default();
    for dir in std::env::split_paths(&path_var) {
        if dir.as_os_str().is_empty() {
            continue;
        }
        let candidate = dir.join(command);
        if candidate.exists() {
            return Some(std::fs::canonicalize(&candidate).unwrap_or(candidate));
        }
    }

    None
}

/// Probe for the configured compiler
///
/// Never fails with an error: a command that cannot be resolved, cannot be
/// spawned, exits non-zero, or does not finish within `budget` all report
/// [`ToolchainStatus::Missing`]. Present but unresponsive is not available.
pub async fn probe(compiler: &CompilerConfig, budget: Duration) -> ToolchainStatus {
    let Some(path) = resolve_command(&compiler.command) else {
        debug!(command = %compiler.command, "compiler not found in PATH");
        return ToolchainStatus::Missing;
    };

    let mut command = Command::new(&path);
    command
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    let output = match tokio::time::timeout(budget, command.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            warn!(path = %path.display(), error = %e, "failed to spawn compiler probe");
            return ToolchainStatus::Missing;
        }
        Err(_) => {
            warn!(path = %path.display(), "compiler probe timed out");
            return ToolchainStatus::Missing;
        }
    };

    if !output.status.success() {
        warn!(
            path = %path.display(),
            code = output.status.code(),
            "compiler probe exited non-zero"
        );
        return ToolchainStatus::Missing;
    }

    let version = String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .unwrap_or("")
        .trim()
        .to_owned();
    let version = if version.is_empty() {
        "unknown".to_owned()
    } else {
        version
    };

    debug!(path = %path.display(), version = %version, "compiler probe succeeded");
    ToolchainStatus::Available(Toolchain { path, version })
}
