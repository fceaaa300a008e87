//! Error types for ppi-core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for ppi-core operations.
pub type Result<T> = std::result::Result<T, PpiError>;

/// Errors surfaced by network browsing and graph analysis.
#[derive(Error, Debug)]
pub enum PpiError {
    /// A file, network, node, component or protein does not exist.
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// What was looked up (e.g. "network", "node").
        kind: &'static str,
        /// The identifier that failed to resolve.
        id: String,
    },

    /// The request is malformed (bad extension, page out of range, ...).
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of the problem.
        message: String,
    },

    /// Parsing or layout failed on an otherwise well-formed request.
    #[error("Error {operation}: {message}")]
    ComputationFailure {
        /// The operation that was running, e.g. "computing layout".
        operation: &'static str,
        /// Description of the failure.
        message: String,
    },

    /// IO error reading a network directory or file.
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl PpiError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        PpiError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        PpiError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn computation(operation: &'static str, message: impl Into<String>) -> Self {
        PpiError::ComputationFailure {
            operation,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PpiError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for lookups that failed because the target does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PpiError::NotFound { .. })
    }
}
