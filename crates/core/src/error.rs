//! Error types for LinkStacks
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Propagation policy: every error is returned to the immediate caller.
//! The core performs no silent swallowing and commits no partial state.

use crate::tag_path::TagPathError;
use crate::url::UrlError;
use thiserror::Error;

/// Result type alias for LinkStacks operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for LinkStacks
#[derive(Debug, Error)]
pub enum Error {
    /// Input rejected before any mutation (malformed tag path, URL, etc.)
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Operation references a board/link/membership with no matching row
    #[error("{what} not found: {key}")]
    NotFound {
        /// Kind of entity that was looked up ("board", "link", "membership")
        what: &'static str,
        /// The key that failed to resolve
        key: String,
    },

    /// An append or reorder could not be applied atomically because of a
    /// concurrent conflicting write. The caller must re-read and retry.
    #[error("Concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    /// Storage collaborator failure, propagated unchanged
    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Build a `NotFound` error for an entity kind and lookup key
    pub fn not_found(what: &'static str, key: impl Into<String>) -> Self {
        Error::NotFound {
            what,
            key: key.into(),
        }
    }

    /// Build a `ConcurrencyConflict` error with a human-readable reason
    pub fn conflict(reason: impl Into<String>) -> Self {
        Error::ConcurrencyConflict(reason.into())
    }
}

/// Validation failures surfaced to the initiating caller
///
/// These are fully recoverable: nothing was mutated, the caller fixes the
/// input and resubmits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Malformed tag path
    #[error(transparent)]
    TagPath(#[from] TagPathError),

    /// Malformed or unsupported URL
    #[error(transparent)]
    Url(#[from] UrlError),

    /// A link must carry at least one tag path
    #[error("At least one tag path is required")]
    NoTagPaths,

    /// A move referenced an index outside the current ordering
    #[error("Move index out of range: {index} (length {len})")]
    IndexOutOfRange {
        /// The offending index
        index: usize,
        /// Length of the ordering the index was applied to
        len: usize,
    },
}

impl From<TagPathError> for Error {
    fn from(e: TagPathError) -> Self {
        Error::Validation(ValidationError::TagPath(e))
    }
}

impl From<UrlError> for Error {
    fn from(e: UrlError) -> Self {
        Error::Validation(ValidationError::Url(e))
    }
}
