//! Shared error types for AttestDB storage operations.
//!
//! The taxonomy mirrors the signals a host service needs to translate into
//! its own status codes: `NotFound`, `AlreadyExists`, `InvalidInput`,
//! `Internal`, `Unavailable`. Nothing here retries; transient failures are
//! surfaced verbatim and the caller decides.

use thiserror::Error;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Error taxonomy shared by all storage operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No matching row, or a stored row that decodes to an empty key.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A conditional write lost a uniqueness race.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Malformed caller input (bad resource name, empty identifier).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization failure, corrupted stored data, or a wrecked
    /// multi-item transaction. Recoverable: one bad row must never take
    /// the process down.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Backend connectivity or throttling. Not retried here; the caller
    /// must retry.
    #[error("Unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Creates a NotFound error with a message.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Creates an AlreadyExists error with a message.
    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    /// Creates an InvalidInput error with a message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Creates an Internal error with a message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Creates an Unavailable error with a message.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// True when the error indicates the entity was absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::not_found("projects/p1");
        assert_eq!(err.to_string(), "Not found: projects/p1");

        let err = StorageError::already_exists("projects/p1/notes/n1");
        assert_eq!(err.to_string(), "Already exists: projects/p1/notes/n1");
    }

    #[test]
    fn test_is_not_found() {
        assert!(StorageError::not_found("x").is_not_found());
        assert!(!StorageError::internal("x").is_not_found());
    }
}
