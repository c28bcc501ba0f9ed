use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::config::compiler::CompilerConfig;
use crate::types::Limits;

pub mod compiler;
mod loader;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] config::ConfigError),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Sandbox configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Parent directory for per-request workspaces.
    ///
    /// Every request gets its own uniquely named directory under this root.
    /// Uses the system temp directory if not specified.
    #[serde(default)]
    pub workspace_root: Option<PathBuf>,

    /// Wall-clock budgets for the probe, compile, and run phases
    #[serde(default)]
    pub limits: Limits,

    /// Toolchain invocation
    #[serde(default)]
    pub compiler: CompilerConfig,
}

impl Config {
    /// Create a config with the default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective parent directory for workspaces
    pub fn workspace_base(&self) -> PathBuf {
        self.workspace_root
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}
