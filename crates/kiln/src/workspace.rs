//! Workspace lifecycle management
//!
//! Every submission compiles and runs inside its own directory, created at
//! request start and recursively deleted at request end on every exit path.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("failed to create workspace at {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("path traversal not allowed: {0}")]
    InvalidPath(String),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove workspace at {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A per-request directory for compilation and execution side effects
///
/// Exclusively owned by one request: the directory name embeds a random v4
/// UUID so concurrent requests never collide. The executed program's working
/// directory points here, confining anything it writes.
///
/// # Cleanup
///
/// Call [`release()`](Self::release) on every exit path so deletion failures
/// are observable. `release` consumes the workspace, making use-after-release
/// impossible; if a workspace is dropped without release (panic, early
/// return), `Drop` deletes the directory best-effort and logs a warning.
#[derive(Debug)]
pub struct Workspace {
    /// Path to the workspace directory
    path: PathBuf,

    /// Whether the directory has already been removed
    released: bool,
}

impl Workspace {
    /// Create a fresh, uniquely named workspace under `base`
    #[instrument(skip(base))]
    pub async fn create(base: impl AsRef<Path>) -> Result<Self, WorkspaceError> {
        let path = base.as_ref().join(format!("kiln-{}", Uuid::new_v4()));

        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|source| WorkspaceError::Create {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), "workspace created");
        Ok(Self {
            path,
            released: false,
        })
    }

    /// Get the path to the workspace directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the host path to a file inside the workspace
    ///
    /// Returns an error if the name contains path traversal attempts.
    pub fn file_path(&self, name: &str) -> Result<PathBuf, WorkspaceError> {
        if name.is_empty() || name.contains("..") || name.starts_with('/') {
            return Err(WorkspaceError::InvalidPath(name.to_owned()));
        }
        Ok(self.path.join(name))
    }

    /// Write a file into the workspace
    #[instrument(skip(self, content))]
    pub async fn write_file(&self, name: &str, content: &[u8]) -> Result<(), WorkspaceError> {
        let path = self.file_path(name)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| WorkspaceError::Write {
                    path: path.clone(),
                    source,
                })?;
        }

        tokio::fs::write(&path, content)
            .await
            .map_err(|source| WorkspaceError::Write {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), len = content.len(), "wrote file to workspace");
        Ok(())
    }

    /// Recursively delete the workspace
    ///
    /// Consumes the workspace. The return value indicates whether deletion
    /// succeeded and should be checked; on failure the `Drop` backstop will
    /// retry best-effort.
    #[must_use = "release errors should be handled"]
    #[instrument(skip(self))]
    pub async fn release(mut self) -> Result<(), WorkspaceError> {
        tokio::fs::remove_dir_all(&self.path)
            .await
            .map_err(|source| WorkspaceError::Remove {
                path: self.path.clone(),
                source,
            })?;

        self.released = true;
        debug!(path = %self.path.display(), "workspace released");
        Ok(())
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        warn!(
            path = %self.path.display(),
            "workspace dropped without explicit release, deleting best-effort"
        );

        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "best-effort workspace removal failed"
                );
            }
        }
    }
}
