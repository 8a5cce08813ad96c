//! Error types for allocator operations.

use thiserror::Error;

/// Errors produced by allocator components.
#[derive(Debug, Error)]
pub enum AllocatorError {
    /// Identifier does not follow the resource identifier grammar.
    #[error("invalid iri: {0}")]
    InvalidIri(String),
    /// Configuration rejected during validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// Store-specific failure with context.
    #[error("store error: {0}")]
    Store(String),
    /// Filesystem failure in a file-backed store.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Document (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias for library operations.
pub type AllocResult<T> = Result<T, AllocatorError>;

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
