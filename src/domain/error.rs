//! Domain-level errors (no external dependencies)

use std::path::PathBuf;
use thiserror::Error;

/// Domain errors represent structural misuse and invalid input.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found in media tree: {0}")]
    NodeNotFound(String),

    #[error("cannot attach children to leaf: {0}")]
    NotComposite(String),

    #[error("node already attached to a playlist: {0}")]
    AlreadyAttached(String),

    #[error("cycle detected: {child} is {parent} or one of its ancestors")]
    CycleDetected { parent: String, child: String },

    #[error("max attempts must be at least 1, got {0}")]
    InvalidAttemptBound(u32),

    #[error("unknown sort key: {0} (expected date, name or size)")]
    UnknownSortKey(String),

    #[error("invalid library file {}: {message}", path.display())]
    InvalidLibrary { path: PathBuf, message: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
