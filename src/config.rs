//! Configuration surface consumed by the secrets manager.
//!
//! The manager reads the cluster name, the optional identifier prefix, and
//! the `namespace` parameter. Everything else in `parameters` (e.g.
//! `inCluster`, `skipInit`) controls how the transport is bootstrapped and is
//! never interpreted here.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use crate::errors::{Result, SecretsError};

/// Parameter key selecting the backend namespace.
pub const NAMESPACE_PARAMETER: &str = "namespace";

/// Namespace used when the configuration does not name one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Secrets manager configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SecretsConfig {
    /// Cluster name, prepended to identifiers built with the cluster prefix.
    #[validate(length(min = 1, message = "Cluster name cannot be empty"))]
    pub cluster_name: String,

    /// Optional identifier prefix joined ahead of the cluster name.
    pub prefix: String,

    /// Free-form backend parameters. The manager only reads
    /// [`NAMESPACE_PARAMETER`]; transport bootstrap flags live here too but
    /// belong to the transport.
    pub parameters: HashMap<String, String>,
}

impl SecretsConfig {
    /// Create a configuration with the given cluster name.
    pub fn new(cluster_name: impl Into<String>) -> Self {
        Self { cluster_name: cluster_name.into(), ..Default::default() }
    }

    /// Set a backend parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Set the identifier prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// The backend namespace, defaulting to [`DEFAULT_NAMESPACE`].
    pub fn namespace(&self) -> &str {
        self.parameters.get(NAMESPACE_PARAMETER).map(String::as_str).unwrap_or(DEFAULT_NAMESPACE)
    }

    /// Look up a free-form parameter.
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    /// Validate the configuration.
    pub fn validate_config(&self) -> Result<()> {
        Validate::validate(self).map_err(|e| SecretsError::configuration(e.to_string()))
    }
}
