//! Kubernetes transport backed by the cluster Secrets API.
//!
//! Implements [`SecretsTransport`] over the `kube` client, mapping
//! [`SecretManifest`] to `V1 Secret` resources in the configured namespace.
//! Only compiled with the `kubernetes` feature.
//!
//! Bootstrapping (kubeconfig vs. in-cluster service account) is resolved by
//! `kube::Client::try_default`; the manager never reads those flags.

use std::collections::BTreeMap;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;
use kube::api::{Api, DeleteParams, PostParams};
use kube::Client;

use crate::errors::{Result, SecretsError};
use crate::transport::{SecretManifest, SecretsTransport, TransportError, TransportResult};
use crate::types::SecretString;

/// [`SecretsTransport`] over the Kubernetes Secrets API.
#[derive(Clone)]
pub struct KubeTransport {
    client: Client,
}

impl KubeTransport {
    /// Wrap an already-built client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect using the default client inference (kubeconfig when present,
    /// in-cluster service account otherwise).
    pub async fn connect() -> Result<Self> {
        let client = Client::try_default().await.map_err(|e| {
            SecretsError::backend(None, format!("failed to initialize Kubernetes client: {e}"))
        })?;
        tracing::info!("Connected Kubernetes secrets transport");
        Ok(Self { client })
    }

    fn secrets(&self, namespace: &str) -> Api<Secret> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

impl std::fmt::Debug for KubeTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeTransport").finish()
    }
}

#[async_trait]
impl SecretsTransport for KubeTransport {
    async fn read(&self, name: &str, namespace: &str) -> TransportResult<SecretManifest> {
        let secret =
            self.secrets(namespace).get(name).await.map_err(|e| map_kube_error(name, e))?;
        from_secret(secret)
    }

    async fn create(&self, namespace: &str, manifest: &SecretManifest) -> TransportResult<()> {
        self.secrets(namespace)
            .create(&PostParams::default(), &to_secret(manifest))
            .await
            .map(|_| ())
            .map_err(|e| map_kube_error(&manifest.name, e))
    }

    async fn replace(
        &self,
        name: &str,
        namespace: &str,
        manifest: &SecretManifest,
    ) -> TransportResult<()> {
        self.secrets(namespace)
            .replace(name, &PostParams::default(), &to_secret(manifest))
            .await
            .map(|_| ())
            .map_err(|e| map_kube_error(name, e))
    }

    async fn delete(&self, name: &str, namespace: &str) -> TransportResult<()> {
        self.secrets(namespace)
            .delete(name, &DeleteParams::default())
            .await
            .map(|_| ())
            .map_err(|e| map_kube_error(name, e))
    }
}

fn map_kube_error(name: &str, err: kube::Error) -> TransportError {
    match err {
        kube::Error::Api(resp) if resp.code == 404 => TransportError::not_found(name),
        kube::Error::Api(resp) => TransportError::failed(Some(resp.code), resp.message),
        other => TransportError::failed(None, other.to_string()),
    }
}

fn to_secret(manifest: &SecretManifest) -> Secret {
    let data: BTreeMap<String, ByteString> = manifest
        .data
        .iter()
        .map(|(key, value)| (key.clone(), ByteString(value.expose_secret().as_bytes().to_vec())))
        .collect();

    Secret {
        metadata: ObjectMeta {
            name: Some(manifest.name.clone()),
            namespace: Some(manifest.namespace.clone()),
            labels: (!manifest.labels.is_empty()).then(|| manifest.labels.clone()),
            resource_version: manifest.resource_version.clone(),
            ..Default::default()
        },
        data: (!data.is_empty()).then_some(data),
        ..Default::default()
    }
}

fn from_secret(secret: Secret) -> TransportResult<SecretManifest> {
    let name = secret.metadata.name.unwrap_or_default();
    let mut manifest = SecretManifest::new(
        name.clone(),
        secret.metadata.namespace.unwrap_or_default(),
    );
    manifest.labels = secret.metadata.labels.unwrap_or_default();
    manifest.resource_version = secret.metadata.resource_version;
    for (key, ByteString(bytes)) in secret.data.unwrap_or_default() {
        let value = String::from_utf8(bytes).map_err(|_| {
            TransportError::failed(
                None,
                format!("secret '{name}' holds non-UTF-8 data under key '{key}'"),
            )
        })?;
        manifest.data.insert(key, SecretString::new(value));
    }
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_converts_to_secret_resource() {
        let manifest = SecretManifest::new("openmetadata-database-myservice-password", "default")
            .with_label("app", "opencatalog")
            .with_value("secret123");

        let secret = to_secret(&manifest);
        let metadata = &secret.metadata;
        assert_eq!(metadata.name.as_deref(), Some("openmetadata-database-myservice-password"));
        assert_eq!(metadata.namespace.as_deref(), Some("default"));
        assert_eq!(
            metadata.labels.as_ref().and_then(|l| l.get("app")).map(String::as_str),
            Some("opencatalog")
        );

        let data = secret.data.expect("data map");
        assert_eq!(data.get("value"), Some(&ByteString(b"secret123".to_vec())));
    }

    #[test]
    fn test_secret_resource_converts_back_preserving_metadata() {
        let manifest = SecretManifest::new("token", "catalog-system").with_value("abc");
        let mut secret = to_secret(&manifest);
        secret.metadata.resource_version = Some("42".to_string());

        let round = from_secret(secret).unwrap();
        assert_eq!(round.name, "token");
        assert_eq!(round.namespace, "catalog-system");
        assert_eq!(round.value(), Some("abc"));
        assert_eq!(round.resource_version.as_deref(), Some("42"));
    }

    #[test]
    fn test_non_utf8_data_is_a_transport_failure() {
        let mut secret = to_secret(&SecretManifest::new("bad", "default"));
        secret.data =
            Some(BTreeMap::from([("value".to_string(), ByteString(vec![0xff, 0xfe]))]));

        let err = from_secret(secret).unwrap_err();
        assert!(matches!(err, TransportError::Failed { .. }));
        assert!(err.to_string().contains("non-UTF-8"));
    }
}
