//! Typed errors for conditions callers need to tell apart

use std::path::PathBuf;

/// Errors raised by the indexer and converter
#[derive(Debug, thiserror::Error)]
pub enum HelpdocsError {
    /// The helpfile directory is absent (usually an uninitialized submodule)
    #[error("source directory not found: {path:?} (is the git submodule initialized?)")]
    MissingDirectory { path: PathBuf },

    /// A single file could not be read or written
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The lookup artifact exists but cannot be used
    #[error("invalid lookup artifact {path:?}: {message}")]
    Artifact { path: PathBuf, message: String },
}

impl HelpdocsError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
