//! Error types for the helpers.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for stub rendering operations.
pub type StubResult<T> = Result<T, StubError>;

/// Result type alias for container lookups.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Errors that can occur while rendering a stub.
#[derive(Error, Debug)]
pub enum StubError {
    #[error("Stub file '{}' does not exist or is not a readable file: {source}", .path.display())]
    StubNotReadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to create directory '{}': {source}", .path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to file '{}': {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Rendered path '{}' escapes the destination directory '{}'",
        .path.display(),
        .destination.display()
    )]
    PathEscapesDestination { path: PathBuf, destination: PathBuf },

    #[error("Invalid include pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl StubError {
    /// The path the error refers to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::StubNotReadable { path, .. }
            | Self::DirectoryCreationFailed { path, .. }
            | Self::WriteFailed { path, .. }
            | Self::PathEscapesDestination { path, .. } => Some(path.as_path()),
            Self::InvalidPattern { .. } => None,
        }
    }
}

/// Errors that can occur while resolving a service from a container.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Identifier '{0}' not found in container.")]
    NotFound(String),

    #[error(
        "Invalid type for identifier '{id}'. Expected one of [{}], got '{actual}'.",
        .expected.join(", ")
    )]
    InvalidType {
        id: String,
        expected: Vec<&'static str>,
        actual: &'static str,
    },
}
