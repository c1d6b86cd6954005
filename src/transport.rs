//! Backend transport abstraction.
//!
//! The secrets manager never talks to a secret store directly; it goes
//! through [`SecretsTransport`], a thin read/create/replace/delete surface
//! scoped to a namespace. Timeouts, authentication, and retries belong to the
//! transport implementation, not to this crate's orchestration.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::errors::SecretsError;
use crate::types::SecretString;

/// Result type for transport operations.
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Data key under which the secret value is stored in a record.
pub const VALUE_KEY: &str = "value";

/// Errors reported by a transport implementation.
///
/// `NotFound` is a normal outcome at the manager layer (existence probes,
/// idempotent delete); everything else is wrapped into
/// [`SecretsError::Backend`].
#[derive(Error, Debug)]
pub enum TransportError {
    /// The named record does not exist in the namespace.
    #[error("secret '{name}' not found")]
    NotFound { name: String },

    /// Any other transport failure, with the backend status code when known.
    #[error("transport request failed: {message}")]
    Failed { status: Option<u16>, message: String },
}

impl TransportError {
    /// Create a not-found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create a failure with an optional backend status code.
    pub fn failed(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Failed { status, message: message.into() }
    }

    /// True if this error is the not-found outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<TransportError> for SecretsError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::NotFound { name } => {
                SecretsError::backend(Some(404), format!("secret '{name}' not found"))
            }
            TransportError::Failed { status, message } => SecretsError::backend(status, message),
        }
    }
}

/// A secret record as written to and read from the backend.
///
/// Holds exactly one value under [`VALUE_KEY`], plus ownership labels and the
/// backend-assigned `resource_version`, which is opaque here but must be
/// carried through a read-modify-write when the backend requires a full
/// replace payload.
#[derive(Clone, PartialEq)]
pub struct SecretManifest {
    pub name: String,
    pub namespace: String,
    pub labels: BTreeMap<String, String>,
    pub data: BTreeMap<String, SecretString>,
    pub resource_version: Option<String>,
}

impl SecretManifest {
    /// Create an empty manifest for `name` in `namespace`.
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            labels: BTreeMap::new(),
            data: BTreeMap::new(),
            resource_version: None,
        }
    }

    /// Attach a label.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Set the secret value under [`VALUE_KEY`].
    pub fn with_value(mut self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    /// Replace the secret value under [`VALUE_KEY`].
    pub fn set_value(&mut self, value: &str) {
        self.data.insert(VALUE_KEY.to_string(), SecretString::new(value));
    }

    /// The secret value stored under [`VALUE_KEY`], if present.
    pub fn value(&self) -> Option<&str> {
        self.data.get(VALUE_KEY).map(SecretString::expose_secret)
    }
}

impl fmt::Debug for SecretManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManifest")
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .field("labels", &self.labels)
            .field("data_keys", &self.data.keys().collect::<Vec<_>>())
            .field("resource_version", &self.resource_version)
            .finish()
    }
}

/// Opaque transport to the backend secret store.
///
/// Implementations must be `Send + Sync`; each call is an independent
/// request/response with the timeout policy owned by the implementation.
#[async_trait]
pub trait SecretsTransport: Send + Sync {
    /// Read the record named `name` in `namespace`.
    async fn read(&self, name: &str, namespace: &str) -> TransportResult<SecretManifest>;

    /// Create a new record in `namespace`.
    async fn create(&self, namespace: &str, manifest: &SecretManifest) -> TransportResult<()>;

    /// Replace the record named `name` in `namespace` with `manifest`.
    async fn replace(
        &self,
        name: &str,
        namespace: &str,
        manifest: &SecretManifest,
    ) -> TransportResult<()>;

    /// Delete the record named `name` in `namespace`.
    async fn delete(&self, name: &str, namespace: &str) -> TransportResult<()>;
}
