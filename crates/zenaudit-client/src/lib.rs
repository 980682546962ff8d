//! ZenAudit Client - Typed HTTP client for the audit API
//!
//! ## Modules
//!
//! - [`client`] - [`AuditClient`], one method per API route
//! - [`types`] - Request and response bodies

pub mod client;
pub mod types;

pub use client::AuditClient;

use thiserror::Error;

/// Errors that can occur when talking to the audit API
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status
    ///
    /// `message` is the server's `error_message` when the body carries one,
    /// otherwise the raw body text.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message reported by the server
        message: String,
    },

    /// A network-level error occurred
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The response body could not be parsed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Returns true if the server rejected the request as invalid (404)
    pub fn is_rejected(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}

/// Result alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
