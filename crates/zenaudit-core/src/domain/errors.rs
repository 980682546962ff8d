//! Domain error types
//!
//! [`DomainError`] covers construction of domain values (identifiers,
//! timestamps, hash keys). [`AuditError`] is the outcome of a registry or
//! audit-record operation and carries one of the three externally visible
//! kinds: validation, store and invalid input.

use thiserror::Error;

/// Errors that can occur when building domain values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Identifier was empty or otherwise unusable
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// Timestamp cannot be mapped back to a calendar instant
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Hash key derivation was called with nothing to hash
    #[error("No data provided to hash")]
    EmptyHashInput,

    /// Stored status value is neither active nor inactive
    #[error("Invalid status value: {0}")]
    InvalidStatus(i64),
}

/// Errors returned by registry and audit record operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuditError {
    /// Malformed or incomplete input, unknown or inactive organisation,
    /// missing identifier on unregistration
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The backing store failed to read or write
    #[error("Store operation failed: {0}")]
    Store(String),

    /// An internal derivation was handed unusable input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AuditError {
    /// Creates a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        AuditError::Validation(message.into())
    }

    /// Wraps a store failure, keeping the full cause chain in the message
    pub fn store(err: anyhow::Error) -> Self {
        AuditError::Store(format!("{err:#}"))
    }

    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AuditError::Validation(_) => "validation",
            AuditError::Store(_) => "store",
            AuditError::InvalidInput(_) => "invalid_input",
        }
    }

    /// Returns true if the error was caused by the caller's input
    pub fn is_validation(&self) -> bool {
        matches!(self, AuditError::Validation(_))
    }
}

impl From<DomainError> for AuditError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidId(_) => AuditError::Validation(err.to_string()),
            other => AuditError::InvalidInput(other.to_string()),
        }
    }
}
