//! # opencatalog-secrets
//!
//! Pluggable secrets-manager abstraction for the OpenCatalog platform.
//!
//! Stores, retrieves, updates, and deletes sensitive string values
//! (credentials, tokens, passwords) on behalf of the wider system, delegating
//! persistence to a backend secret store. The crate reconciles a generic,
//! hierarchical secret-identifier scheme with the backend's strict naming
//! grammar while keeping create-or-update semantics idempotent and handing
//! the caller a stable `"secret:<identifier>"` reference to persist.
//!
//! ## Architecture
//!
//! ```text
//! caller → SecretsManager → SecretIdBuilder (sanitize)
//!                         → SecretsTransport (read, then create | replace)
//! ```
//!
//! - [`SecretsManager`] drives the read-before-write protocol, applies the
//!   empty-value sentinel, and owns the identifier mapping. It is configured
//!   explicitly via [`SecretsManager::configure`] and torn down with
//!   [`SecretsManager::reset`]; there is no hidden static state.
//! - [`SecretIdBuilder`] joins naming components and sanitizes them through
//!   the [`IdentifierSanitizer`] strategy; [`KubernetesNameSanitizer`]
//!   implements the reference grammar (lowercase `[a-z0-9-]`, 253 chars, no
//!   separator at the edges).
//! - [`SecretsTransport`] is the opaque backend surface. [`InMemoryTransport`]
//!   ships for development and tests; the `kubernetes` feature adds a real
//!   client over the cluster Secrets API.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use opencatalog_secrets::{InMemoryTransport, SecretsConfig, SecretsManager};
//!
//! let manager = SecretsManager::new();
//! let config = SecretsConfig::new("openmetadata")
//!     .with_parameter("namespace", "catalog-system");
//! manager.configure(&config, Arc::new(InMemoryTransport::new()))?;
//!
//! let base = manager.build_secret_id(true, &["database", "myservice"])?;
//! let reference = manager.store_value("password", "secret123", &base, true).await?;
//! assert_eq!(reference, "secret:openmetadata-database-myservice-password");
//! ```
//!
//! ## Security Considerations
//!
//! - Secret values are never logged; in-memory copies are redacted in Debug
//!   output and zeroed on drop ([`SecretString`])
//! - Not-found is a normal outcome, never an error, so probes and idempotent
//!   deletes cannot leak existence through error channels
//! - Encryption at rest, rotation, and access control are the backend
//!   store's responsibility

pub mod config;
pub mod errors;
pub mod identifier;
#[cfg(feature = "kubernetes")]
pub mod kubernetes;
pub mod manager;
pub mod memory;
pub mod transport;
pub mod types;

// Re-export main types
pub use config::SecretsConfig;
pub use errors::{Result, SecretsError};
pub use identifier::{IdentifierSanitizer, KubernetesNameSanitizer, SecretIdBuilder};
#[cfg(feature = "kubernetes")]
pub use kubernetes::KubeTransport;
pub use manager::{SecretsManager, NULL_SECRET_STRING, SECRET_TAG};
pub use memory::InMemoryTransport;
pub use transport::{SecretManifest, SecretsTransport, TransportError};
pub use types::SecretString;

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
