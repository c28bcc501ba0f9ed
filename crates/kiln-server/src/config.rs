//! Server configuration
//!
//! Wraps the sandbox configuration with the hosting-layer settings: the bind
//! address and the optional concurrency cap. The embedded example config
//! doubles as the source of defaults.

use std::net::SocketAddr;
use std::path::Path;

use config::{Config as ConfigBuilder, File, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Example configuration embedded at compile time.
///
/// Written out by `kiln init`; also parsed to produce the defaults.
pub const EXAMPLE_CONFIG: &str = include_str!("../kiln.example.toml");

#[derive(Debug, Error)]
pub enum ServerConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] config::ConfigError),

    #[error(transparent)]
    Sandbox(#[from] kiln::ConfigError),
}

/// Full configuration for the kiln service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub sandbox: kiln::Config,
}

/// Hosting-layer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSection {
    /// Address the HTTP listener binds to
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,

    /// Maximum concurrent compile requests; 0 means unbounded
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

fn default_bind() -> SocketAddr {
    // The port the browser frontend expects
    ([0, 0, 0, 0], 5000).into()
}

fn default_max_concurrency() -> usize {
    32
}

impl ServerConfig {
    /// Load configuration from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ServerConfigError> {
        let config = ConfigBuilder::builder()
            .add_source(File::from(path.as_ref()))
            .build()?;

        let config: ServerConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self, ServerConfigError> {
        let config = ConfigBuilder::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?;

        let config: ServerConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ServerConfigError> {
        self.sandbox.validate()?;
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::parse_toml(EXAMPLE_CONFIG).expect("embedded example config must parse")
    }
}
