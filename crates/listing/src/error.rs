//! Error types for the listing crate.

use thiserror::Error;

/// Why a listing or delivery request was refused.
///
/// Messages never contain filesystem paths so they are safe to surface to
/// operators without leaking the layout under the root.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The requested path resolves outside the root, lexically or through a
    /// symlink.
    #[error("requested path escapes the root")]
    PathEscape,

    /// A segment of the requested path is in the ignore set.
    #[error("path segment is blocked: {segment}")]
    Blocked {
        /// The offending segment.
        segment: String,
    },

    /// The target does not exist or is the wrong kind for the operation.
    #[error("not found")]
    NotFound,

    /// Filesystem error while reading (permissions, concurrent removal).
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

/// The classification handed to the routing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Refuse without revealing whether the target exists.
    Forbidden,
    /// Nothing to show at this path.
    NotFound,
}

impl AccessError {
    /// Collapse the taxonomy to what the caller may reveal.
    ///
    /// Transient I/O failures are reported as `NotFound`.
    pub fn outcome(&self) -> Outcome {
        match self {
            AccessError::PathEscape | AccessError::Blocked { .. } => Outcome::Forbidden,
            AccessError::NotFound | AccessError::Io(_) => Outcome::NotFound,
        }
    }

    /// Whether this error is worth an operator's attention.
    pub fn is_transient(&self) -> bool {
        matches!(self, AccessError::Io(_))
    }

    /// Map an I/O error from a lookup, treating absence as `NotFound`.
    pub(crate) fn from_lookup(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory => {
                AccessError::NotFound
            }
            _ => AccessError::Io(err),
        }
    }
}

/// Result type alias for listing operations.
pub type Result<T> = std::result::Result<T, AccessError>;
