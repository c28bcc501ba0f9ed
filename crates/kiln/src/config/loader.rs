//! Configuration file loading for the sandbox
//!
//! Handles loading and parsing configuration files using the config crate.

use std::path::Path;

use config::{Config as ConfigBuilder, File, FileFormat};

use crate::config::{Config, ConfigError};

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = ConfigBuilder::builder()
            .add_source(File::from(path))
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        let config = ConfigBuilder::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, seconds) in [
            ("compile_timeout", self.limits.compile_timeout),
            ("run_timeout", self.limits.run_timeout),
            ("probe_timeout", self.limits.probe_timeout),
        ] {
            if !seconds.is_finite() || seconds <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive number of seconds, got {seconds}"
                )));
            }
        }

        if self.compiler.command.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "compiler command is empty".to_owned(),
            ));
        }
        if !self
            .compiler
            .args
            .iter()
            .any(|arg| arg.contains("{source}"))
        {
            return Err(ConfigError::Invalid(
                "compiler args never reference {source}".to_owned(),
            ));
        }
        if !self
            .compiler
            .args
            .iter()
            .any(|arg| arg.contains("{output}"))
        {
            return Err(ConfigError::Invalid(
                "compiler args never reference {output}".to_owned(),
            ));
        }

        for (name, value) in [
            ("source_name", &self.compiler.source_name),
            ("artifact_name", &self.compiler.artifact_name),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Invalid(format!("compiler {name} is empty")));
            }
            if value.contains(['/', '\\']) || value.contains("..") {
                return Err(ConfigError::Invalid(format!(
                    "compiler {name} must be a bare file name, got '{value}'"
                )));
            }
        }

        Ok(())
    }
}
