//! Secrets manager orchestration.
//!
//! [`SecretsManager`] owns the mapping from logical secrets to backend-legal
//! identifiers and drives the read-before-write protocol against a
//! [`SecretsTransport`]. It is constructed explicitly and configured through
//! [`SecretsManager::configure`] / [`SecretsManager::reset`], so tests and
//! process-level reconfiguration (e.g. rotating the namespace) can tear state
//! down deterministically. There is no hidden static instance.
//!
//! Every public operation is a bounded sequence of at most one read followed
//! by at most one write. Concurrent calls for the same identifier race at the
//! backend (last-write-wins on replace); this layer adds no locking and no
//! retries.

use std::sync::{Arc, RwLock};

use crate::config::SecretsConfig;
use crate::errors::{Result, SecretsError};
use crate::identifier::{IdentifierSanitizer, SecretIdBuilder};
use crate::transport::{SecretManifest, SecretsTransport, TransportError};

/// Backend tag encoded into stored references: `"secret:<identifier>"`.
pub const SECRET_TAG: &str = "secret";

/// Sentinel written in place of an empty value.
///
/// Many secret stores reject or mishandle zero-length values. Read-back
/// returns this literal verbatim; callers must never treat it as a real
/// value.
pub const NULL_SECRET_STRING: &str = "null";

const APP_LABEL_KEY: &str = "app";
const APP_LABEL_VALUE: &str = "opencatalog";
const MANAGED_BY_LABEL_KEY: &str = "managed-by";
const MANAGED_BY_LABEL_VALUE: &str = "opencatalog-secrets-manager";

#[derive(Clone)]
struct ManagerState {
    transport: Arc<dyn SecretsTransport>,
    namespace: String,
    cluster_name: String,
    prefix: String,
}

/// Orchestrates secret CRUD against a pluggable backend transport.
pub struct SecretsManager {
    state: RwLock<Option<ManagerState>>,
    id_builder: SecretIdBuilder,
}

impl Default for SecretsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretsManager {
    /// Create an unconfigured manager with the Kubernetes naming grammar.
    pub fn new() -> Self {
        Self { state: RwLock::new(None), id_builder: SecretIdBuilder::kubernetes() }
    }

    /// Create an unconfigured manager over a custom identifier grammar.
    pub fn with_sanitizer(sanitizer: Arc<dyn IdentifierSanitizer>) -> Self {
        Self { state: RwLock::new(None), id_builder: SecretIdBuilder::new(sanitizer) }
    }

    /// Validate `config` and install it together with the transport handle.
    ///
    /// Reconfiguring drops the previous transport handle; it does not leak.
    pub fn configure(
        &self,
        config: &SecretsConfig,
        transport: Arc<dyn SecretsTransport>,
    ) -> Result<()> {
        config.validate_config()?;
        let next = ManagerState {
            transport,
            namespace: config.namespace().to_string(),
            cluster_name: config.cluster_name.clone(),
            prefix: config.prefix.clone(),
        };
        tracing::info!(
            namespace = %next.namespace,
            cluster_name = %next.cluster_name,
            "Configured secrets manager"
        );
        *self.state.write().expect("secrets manager state lock poisoned") = Some(next);
        Ok(())
    }

    /// Clear the configuration and drop the transport handle.
    pub fn reset(&self) {
        *self.state.write().expect("secrets manager state lock poisoned") = None;
        tracing::debug!("Reset secrets manager");
    }

    /// True once `configure` has succeeded and `reset` has not been called.
    pub fn is_configured(&self) -> bool {
        self.state.read().expect("secrets manager state lock poisoned").is_some()
    }

    fn state(&self) -> Result<ManagerState> {
        self.state
            .read()
            .expect("secrets manager state lock poisoned")
            .clone()
            .ok_or_else(|| SecretsError::configuration("secrets manager used before configure()"))
    }

    /// Build a backend-legal secret identifier from naming components.
    ///
    /// With `add_cluster_prefix`, the configured prefix (when non-empty) and
    /// cluster name are joined ahead of `components`.
    pub fn build_secret_id(&self, add_cluster_prefix: bool, components: &[&str]) -> Result<String> {
        if !add_cluster_prefix {
            return self.id_builder.build(components);
        }
        let state = self.state()?;
        let mut parts: Vec<&str> = Vec::with_capacity(components.len() + 2);
        if !state.prefix.is_empty() {
            parts.push(&state.prefix);
        }
        parts.push(&state.cluster_name);
        parts.extend_from_slice(components);
        self.id_builder.build(&parts)
    }

    /// Store `value` for `field_name` under the identifier derived from
    /// `secret_id`, returning the `"secret:<identifier>"` reference.
    ///
    /// An empty value is substituted with [`NULL_SECRET_STRING`] before the
    /// write. One existence probe precedes exactly one write: create when the
    /// record is absent, full replace (metadata preserved) when it exists.
    pub async fn store_value(
        &self,
        field_name: &str,
        value: &str,
        secret_id: &str,
        is_update: bool,
    ) -> Result<String> {
        let state = self.state()?;
        let name = self.id_builder.build_field(secret_id, field_name)?;
        let stored = if value.is_empty() { NULL_SECRET_STRING } else { value };

        match state.transport.read(&name, &state.namespace).await {
            Ok(mut existing) => {
                if !is_update {
                    tracing::warn!(
                        name = %name,
                        namespace = %state.namespace,
                        "Secret already exists for a create request; replacing in place"
                    );
                }
                existing.set_value(stored);
                state
                    .transport
                    .replace(&name, &state.namespace, &existing)
                    .await
                    .map_err(|e| Self::backend_failure("replace", &name, e))?;
                tracing::info!(name = %name, namespace = %state.namespace, "Replaced secret");
            }
            Err(TransportError::NotFound { .. }) => {
                let manifest = Self::new_manifest(&name, &state.namespace).with_value(stored);
                state
                    .transport
                    .create(&state.namespace, &manifest)
                    .await
                    .map_err(|e| Self::backend_failure("create", &name, e))?;
                tracing::info!(name = %name, namespace = %state.namespace, "Created secret");
            }
            Err(e) => return Err(Self::backend_failure("read", &name, e)),
        }

        Ok(format!("{SECRET_TAG}:{name}"))
    }

    /// Read the value stored under `name`.
    ///
    /// A missing record yields `Ok(None)`. The [`NULL_SECRET_STRING`]
    /// sentinel is returned verbatim, never reversed.
    pub async fn get_secret(&self, name: &str) -> Result<Option<String>> {
        let state = self.state()?;
        match state.transport.read(name, &state.namespace).await {
            Ok(manifest) => {
                let value = manifest.value().map(str::to_string).ok_or_else(|| {
                    SecretsError::backend(None, format!("secret '{name}' has no 'value' field"))
                })?;
                Ok(Some(value))
            }
            Err(TransportError::NotFound { .. }) => Ok(None),
            Err(e) => Err(Self::backend_failure("read", name, e)),
        }
    }

    /// Replace the value stored under `name`, creating the record if it is
    /// missing.
    ///
    /// The not-found fallback makes updates idempotent and tolerant of
    /// out-of-band deletion.
    pub async fn update_secret(&self, name: &str, value: &str) -> Result<()> {
        let state = self.state()?;
        let stored = if value.is_empty() { NULL_SECRET_STRING } else { value };

        match state.transport.read(name, &state.namespace).await {
            Ok(mut existing) => {
                existing.set_value(stored);
                state
                    .transport
                    .replace(name, &state.namespace, &existing)
                    .await
                    .map_err(|e| Self::backend_failure("replace", name, e))?;
                tracing::info!(name = %name, namespace = %state.namespace, "Updated secret");
            }
            Err(TransportError::NotFound { .. }) => {
                let manifest = Self::new_manifest(name, &state.namespace).with_value(stored);
                state
                    .transport
                    .create(&state.namespace, &manifest)
                    .await
                    .map_err(|e| Self::backend_failure("create", name, e))?;
                tracing::info!(
                    name = %name,
                    namespace = %state.namespace,
                    "Created secret on update of a missing record"
                );
            }
            Err(e) => return Err(Self::backend_failure("read", name, e)),
        }
        Ok(())
    }

    /// True iff a record exists under `name`.
    pub async fn exist_secret(&self, name: &str) -> Result<bool> {
        let state = self.state()?;
        match state.transport.read(name, &state.namespace).await {
            Ok(_) => Ok(true),
            Err(TransportError::NotFound { .. }) => Ok(false),
            Err(e) => Err(Self::backend_failure("read", name, e)),
        }
    }

    /// Delete the record under `name`. Deleting a record that is already
    /// gone is success, so retries and double-invocation are safe.
    pub async fn delete_secret(&self, name: &str) -> Result<()> {
        let state = self.state()?;
        match state.transport.delete(name, &state.namespace).await {
            Ok(()) => {
                tracing::info!(name = %name, namespace = %state.namespace, "Deleted secret");
                Ok(())
            }
            Err(TransportError::NotFound { .. }) => {
                tracing::debug!(name = %name, "Secret already absent on delete");
                Ok(())
            }
            Err(e) => Err(Self::backend_failure("delete", name, e)),
        }
    }

    fn new_manifest(name: &str, namespace: &str) -> SecretManifest {
        SecretManifest::new(name, namespace)
            .with_label(APP_LABEL_KEY, APP_LABEL_VALUE)
            .with_label(MANAGED_BY_LABEL_KEY, MANAGED_BY_LABEL_VALUE)
    }

    fn backend_failure(operation: &str, name: &str, err: TransportError) -> SecretsError {
        tracing::error!(
            error = %err,
            operation = operation,
            name = %name,
            "Secrets backend request failed"
        );
        err.into()
    }
}

impl std::fmt::Debug for SecretsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let configured = self.is_configured();
        f.debug_struct("SecretsManager")
            .field("configured", &configured)
            .field("id_builder", &self.id_builder)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryTransport;

    fn configured_manager() -> (SecretsManager, Arc<InMemoryTransport>) {
        let transport = Arc::new(InMemoryTransport::new());
        let manager = SecretsManager::new();
        let config = SecretsConfig::new("openmetadata");
        manager.configure(&config, transport.clone()).expect("configure");
        (manager, transport)
    }

    #[test]
    fn test_unconfigured_manager_rejects_operations() {
        let manager = SecretsManager::new();
        assert!(!manager.is_configured());
        let err = manager.build_secret_id(true, &["database", "myservice"]).unwrap_err();
        assert!(matches!(err, SecretsError::Configuration { .. }));
    }

    #[test]
    fn test_configure_rejects_invalid_config() {
        let manager = SecretsManager::new();
        let err = manager
            .configure(&SecretsConfig::default(), Arc::new(InMemoryTransport::new()))
            .unwrap_err();
        assert!(matches!(err, SecretsError::Configuration { .. }));
        assert!(!manager.is_configured());
    }

    #[test]
    fn test_build_secret_id_with_cluster_prefix() {
        let (manager, _) = configured_manager();
        assert_eq!(
            manager.build_secret_id(true, &["database", "myservice"]).unwrap(),
            "openmetadata-database-myservice"
        );
        assert_eq!(manager.build_secret_id(true, &["bot", "_mybot"]).unwrap(), "openmetadata-bot-mybot");
        assert_eq!(
            manager.build_secret_id(false, &["database", "myservice"]).unwrap(),
            "database-myservice"
        );
    }

    #[test]
    fn test_build_secret_id_honors_configured_prefix() {
        let transport = Arc::new(InMemoryTransport::new());
        let manager = SecretsManager::new();
        let config = SecretsConfig::new("openmetadata").with_prefix("prod");
        manager.configure(&config, transport).expect("configure");

        assert_eq!(
            manager.build_secret_id(true, &["database", "mydb"]).unwrap(),
            "prod-openmetadata-database-mydb"
        );
    }

    #[test]
    fn test_reset_clears_state() {
        let (manager, _) = configured_manager();
        assert!(manager.is_configured());
        manager.reset();
        assert!(!manager.is_configured());
    }

    #[tokio::test]
    async fn test_invalid_identifier_fails_before_any_backend_call() {
        let (manager, transport) = configured_manager();
        let err = manager.store_value("_!_", "v", "---", true).await.unwrap_err();
        assert!(matches!(err, SecretsError::InvalidIdentifier { .. }));
        assert!(transport.is_empty());
    }
}
