//! In-memory transport for development and tests.
//!
//! Keeps records in a process-local map while preserving the backend's
//! semantics: create conflicts on an existing name, replace and delete report
//! not-found, and a resource version is assigned and bumped on every write.
//! **Not for production use**: nothing is persisted or encrypted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::transport::{SecretManifest, SecretsTransport, TransportError, TransportResult};

/// Process-local [`SecretsTransport`] with Kubernetes-like semantics.
#[derive(Clone, Default)]
pub struct InMemoryTransport {
    store: Arc<Mutex<HashMap<(String, String), SecretManifest>>>,
}

impl InMemoryTransport {
    /// Create an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored, across all namespaces.
    pub fn len(&self) -> usize {
        self.store.lock().unwrap().len()
    }

    /// True if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn key(namespace: &str, name: &str) -> (String, String) {
        (namespace.to_string(), name.to_string())
    }
}

#[async_trait]
impl SecretsTransport for InMemoryTransport {
    async fn read(&self, name: &str, namespace: &str) -> TransportResult<SecretManifest> {
        let guard = self.store.lock().unwrap();
        guard
            .get(&Self::key(namespace, name))
            .cloned()
            .ok_or_else(|| TransportError::not_found(name))
    }

    async fn create(&self, namespace: &str, manifest: &SecretManifest) -> TransportResult<()> {
        let mut guard = self.store.lock().unwrap();
        let key = Self::key(namespace, &manifest.name);
        if guard.contains_key(&key) {
            return Err(TransportError::failed(
                Some(409),
                format!("secret '{}' already exists", manifest.name),
            ));
        }
        let mut stored = manifest.clone();
        stored.namespace = namespace.to_string();
        stored.resource_version = Some("1".to_string());
        guard.insert(key, stored);
        Ok(())
    }

    async fn replace(
        &self,
        name: &str,
        namespace: &str,
        manifest: &SecretManifest,
    ) -> TransportResult<()> {
        let mut guard = self.store.lock().unwrap();
        let key = Self::key(namespace, name);
        let existing = guard.get(&key).ok_or_else(|| TransportError::not_found(name))?;

        let next_version = existing
            .resource_version
            .as_deref()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0)
            + 1;
        let mut stored = manifest.clone();
        stored.name = name.to_string();
        stored.namespace = namespace.to_string();
        stored.resource_version = Some(next_version.to_string());
        guard.insert(key, stored);
        Ok(())
    }

    async fn delete(&self, name: &str, namespace: &str) -> TransportResult<()> {
        let mut guard = self.store.lock().unwrap();
        guard
            .remove(&Self::key(namespace, name))
            .map(|_| ())
            .ok_or_else(|| TransportError::not_found(name))
    }
}

impl std::fmt::Debug for InMemoryTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTransport").field("records", &self.len()).finish()
    }
}
