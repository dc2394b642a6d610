//! Error handling for PCBKit
//!
//! Only a handful of failures are allowed to reach the caller of the
//! board pipeline. Unrecognised CAM input is skipped by the interpreters
//! and degenerate geometry is filtered where it is produced, so the
//! types here mostly describe archive-level problems.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Top-level error type for the core crate.
#[derive(Error, Debug)]
pub enum Error {
    /// The archive itself could not be opened. This is the one fatal
    /// pipeline failure.
    #[error("Invalid archive: {reason}")]
    Archive {
        /// The reason reported by the zip reader.
        reason: String,
    },

    /// A single archive entry could not be read.
    #[error("Failed to read entry '{path}': {reason}")]
    Entry {
        /// Normalised path of the entry.
        path: String,
        /// The reason the read failed.
        reason: String,
    },

    /// A blocking worker task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(String),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Create an archive error from anything displayable
    pub fn archive(reason: impl std::fmt::Display) -> Self {
        Error::Archive {
            reason: reason.to_string(),
        }
    }

    /// Check if this error means the archive could not be opened at all
    pub fn is_archive_error(&self) -> bool {
        matches!(self, Error::Archive { .. })
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::archive(err)
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Task(err.to_string())
    }
}

/// Result type alias for PCBKit core operations
pub type Result<T> = std::result::Result<T, Error>;
