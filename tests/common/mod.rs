//! Shared test support: transports that record or fail backend calls.

use std::sync::Mutex;

use async_trait::async_trait;
use opencatalog_secrets::{
    InMemoryTransport, SecretManifest, SecretsTransport, TransportError,
};

type TransportResult<T> = std::result::Result<T, TransportError>;

/// A backend call observed by [`RecordingTransport`], tagged with the record
/// name it targeted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Read(String),
    Create(String),
    Replace(String),
    Delete(String),
}

/// Wraps [`InMemoryTransport`] and records every call, so tests can assert on
/// the exact read/create/replace sequence an operation issued.
#[derive(Default)]
pub struct RecordingTransport {
    inner: InMemoryTransport,
    calls: Mutex<Vec<BackendCall>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls observed so far, in order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Forget previously observed calls.
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Insert a record directly, bypassing call recording.
    pub async fn seed(&self, namespace: &str, manifest: &SecretManifest) {
        self.inner.create(namespace, manifest).await.expect("seed record");
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SecretsTransport for RecordingTransport {
    async fn read(&self, name: &str, namespace: &str) -> TransportResult<SecretManifest> {
        self.record(BackendCall::Read(name.to_string()));
        self.inner.read(name, namespace).await
    }

    async fn create(&self, namespace: &str, manifest: &SecretManifest) -> TransportResult<()> {
        self.record(BackendCall::Create(manifest.name.clone()));
        self.inner.create(namespace, manifest).await
    }

    async fn replace(
        &self,
        name: &str,
        namespace: &str,
        manifest: &SecretManifest,
    ) -> TransportResult<()> {
        self.record(BackendCall::Replace(name.to_string()));
        self.inner.replace(name, namespace, manifest).await
    }

    async fn delete(&self, name: &str, namespace: &str) -> TransportResult<()> {
        self.record(BackendCall::Delete(name.to_string()));
        self.inner.delete(name, namespace).await
    }
}

/// A transport where every call fails with a server error, for exercising
/// the backend-error propagation paths.
#[derive(Debug, Default)]
pub struct FailingTransport;

impl FailingTransport {
    fn boom<T>() -> TransportResult<T> {
        Err(TransportError::failed(Some(500), "simulated backend outage"))
    }
}

#[async_trait]
impl SecretsTransport for FailingTransport {
    async fn read(&self, _name: &str, _namespace: &str) -> TransportResult<SecretManifest> {
        Self::boom()
    }

    async fn create(&self, _namespace: &str, _manifest: &SecretManifest) -> TransportResult<()> {
        Self::boom()
    }

    async fn replace(
        &self,
        _name: &str,
        _namespace: &str,
        _manifest: &SecretManifest,
    ) -> TransportResult<()> {
        Self::boom()
    }

    async fn delete(&self, _name: &str, _namespace: &str) -> TransportResult<()> {
        Self::boom()
    }
}
