//! Error types for secrets management operations.

use thiserror::Error;

/// Result type for secrets operations.
pub type Result<T> = std::result::Result<T, SecretsError>;

/// Errors surfaced by the secrets manager.
///
/// Not-found is deliberately absent: every operation that probes existence
/// normalizes a missing record to an `Option`/`bool`/no-op outcome instead of
/// raising. See [`crate::transport::TransportError`] for the transport-facing
/// taxonomy.
#[derive(Error, Debug)]
pub enum SecretsError {
    /// The caller-supplied identifier components have no legal backend
    /// representation. Raised before any backend call is attempted.
    #[error("Invalid secret identifier '{identifier}': {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    /// Any transport failure other than not-found (auth failure, malformed
    /// request, server error). Carries the backend status code when the
    /// transport reported one. Never retried at this layer.
    #[error("Secrets backend error: {message}")]
    Backend { status: Option<u16>, message: String },

    /// The manager was used before `configure()`, or the supplied
    /// configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl SecretsError {
    /// Create an invalid identifier error.
    pub fn invalid_identifier(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier { identifier: identifier.into(), reason: reason.into() }
    }

    /// Create a backend error.
    pub fn backend(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Backend { status, message: message.into() }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }
}
