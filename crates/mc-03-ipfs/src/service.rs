//! # IPFS Client
//!
//! Ordered provider and gateway lists with fall-through.
//!
//! | Operation  | Strategy                                                   |
//! |------------|------------------------------------------------------------|
//! | `upload`   | skip unconfigured providers, first successful pin wins      |
//! | `download` | gateways in order, first successful fetch wins             |
//!
//! Nothing is retried beyond walking the list once.

use crate::adapters::{HttpGateway, PinataService, Web3StorageService};
use crate::domain::config::{IpfsConfig, FALLBACK_GATEWAY};
use crate::domain::errors::IpfsError;
use crate::domain::types::{gateway_link, UploadResponse, APPLICATION_JSON, OCTET_STREAM};
use crate::ports::outbound::{ContentSource, PinningService};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::Cid;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Uploads to the first working provider and downloads from the first
/// working gateway.
#[derive(Clone)]
pub struct IpfsClient {
    providers: Vec<Arc<dyn PinningService>>,
    sources: Vec<Arc<dyn ContentSource>>,
}

impl IpfsClient {
    /// Build from explicit provider and source lists (order matters).
    pub fn new(
        providers: Vec<Arc<dyn PinningService>>,
        sources: Vec<Arc<dyn ContentSource>>,
    ) -> Self {
        Self { providers, sources }
    }

    /// Web3.storage then Pinata, and the configured gateways.
    pub fn from_config(config: &IpfsConfig) -> Result<Self, IpfsError> {
        let upload_timeout = Duration::from_secs(config.upload_timeout_secs);
        let gateway_timeout = Duration::from_secs(config.gateway_timeout_secs);

        let providers: Vec<Arc<dyn PinningService>> = vec![
            Arc::new(Web3StorageService::new(
                config.web3_storage_token.clone(),
                upload_timeout,
            )?),
            Arc::new(PinataService::new(
                config.pinata_api_key.clone(),
                config.pinata_secret_key.clone(),
                upload_timeout,
            )?),
        ];
        let sources = config
            .gateways
            .iter()
            .map(|base| {
                HttpGateway::new(base.clone(), gateway_timeout)
                    .map(|g| Arc::new(g) as Arc<dyn ContentSource>)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(providers, sources))
    }

    /// True when at least one provider can accept uploads.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.providers.iter().any(|p| p.is_configured())
    }

    /// Pin `data`, falling through configured providers in order.
    ///
    /// # Errors
    /// * `IpfsError::NotConfigured` - no provider has credentials
    /// * `IpfsError::UploadFailed` - every configured provider failed
    #[instrument(skip(self, data), fields(len = data.len()))]
    pub async fn upload(
        &self,
        data: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<UploadResponse, IpfsError> {
        let configured: Vec<_> = self.providers.iter().filter(|p| p.is_configured()).collect();
        if configured.is_empty() {
            return Err(IpfsError::NotConfigured);
        }

        let mut failures = Vec::with_capacity(configured.len());
        for provider in configured {
            match provider.pin(data.clone(), file_name, content_type).await {
                Ok(response) => {
                    info!(provider = provider.name(), cid = %response.cid, "Uploaded to IPFS");
                    return Ok(response);
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "Pinning failed, trying next provider"
                    );
                    failures.push(format!("{}: {e}", provider.name()));
                }
            }
        }
        Err(IpfsError::UploadFailed(failures.join("; ")))
    }

    /// Serialize `value` to JSON and pin it.
    pub async fn upload_json<T: Serialize + ?Sized>(
        &self,
        value: &T,
        file_name: &str,
    ) -> Result<UploadResponse, IpfsError> {
        let json = serde_json::to_vec(value).map_err(|e| IpfsError::Parse(e.to_string()))?;
        self.upload(json, file_name, APPLICATION_JSON).await
    }

    /// Pin an encrypted envelope as an opaque blob named `encrypted_{file_name}`.
    pub async fn upload_encrypted<T: Serialize + ?Sized>(
        &self,
        envelope: &T,
        file_name: &str,
    ) -> Result<UploadResponse, IpfsError> {
        let json = serde_json::to_vec(envelope).map_err(|e| IpfsError::Parse(e.to_string()))?;
        self.upload(json, &format!("encrypted_{file_name}"), OCTET_STREAM)
            .await
    }

    /// Fetch `cid` from the first gateway that answers.
    ///
    /// # Errors
    /// * `IpfsError::DownloadFailed` - no gateway produced the content
    #[instrument(skip(self), fields(cid = %cid))]
    pub async fn download(&self, cid: &Cid) -> Result<Vec<u8>, IpfsError> {
        for source in &self.sources {
            match source.fetch(cid).await {
                Ok(bytes) => {
                    debug!(gateway = source.name(), len = bytes.len(), "Downloaded from IPFS");
                    return Ok(bytes);
                }
                Err(e) => {
                    warn!(gateway = source.name(), error = %e, "Gateway failed, trying next");
                }
            }
        }
        Err(IpfsError::DownloadFailed)
    }

    /// Fetch `cid` and parse it as JSON.
    pub async fn download_json<T: DeserializeOwned>(&self, cid: &Cid) -> Result<T, IpfsError> {
        let bytes = self.download(cid).await?;
        serde_json::from_slice(&bytes).map_err(|e| IpfsError::Parse(e.to_string()))
    }

    /// Link for `cid` through the first configured provider's gateway.
    #[must_use]
    pub fn gateway_url(&self, cid: &Cid) -> String {
        let base = self
            .providers
            .iter()
            .find(|p| p.is_configured())
            .map_or(FALLBACK_GATEWAY, |p| p.gateway_base());
        gateway_link(base, cid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryIpfs;
    use serde::Deserialize;

    fn client(providers: &[Arc<InMemoryIpfs>], sources: &[Arc<InMemoryIpfs>]) -> IpfsClient {
        IpfsClient::new(
            providers
                .iter()
                .map(|p| Arc::clone(p) as Arc<dyn PinningService>)
                .collect(),
            sources
                .iter()
                .map(|s| Arc::clone(s) as Arc<dyn ContentSource>)
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_no_providers_is_not_configured() {
        let c = IpfsClient::new(vec![], vec![]);
        let err = c.upload(vec![1], "a", "b").await.unwrap_err();
        assert!(matches!(err, IpfsError::NotConfigured));
        assert_eq!(err.to_string(), "No IPFS service configured");
    }

    #[tokio::test]
    async fn test_unconfigured_providers_are_skipped() {
        let off = Arc::new(InMemoryIpfs::unconfigured("off"));
        let on = Arc::new(InMemoryIpfs::named("on"));
        let c = client(&[Arc::clone(&off), Arc::clone(&on)], &[]);
        c.upload(b"x".to_vec(), "x", OCTET_STREAM).await.unwrap();
        assert_eq!(off.pin_count(), 0);
        assert_eq!(on.pin_count(), 1);
    }

    #[tokio::test]
    async fn test_only_unconfigured_is_not_configured() {
        let off = Arc::new(InMemoryIpfs::unconfigured("off"));
        let c = client(&[off], &[]);
        assert!(matches!(
            c.upload(vec![1], "a", "b").await,
            Err(IpfsError::NotConfigured)
        ));
        assert!(!c.is_configured());
    }

    #[tokio::test]
    async fn test_falls_through_to_second_provider() {
        let first = Arc::new(InMemoryIpfs::named("first"));
        let second = Arc::new(InMemoryIpfs::named("second"));
        first.set_failing(true);
        let c = client(&[Arc::clone(&first), Arc::clone(&second)], &[]);
        let response = c.upload(b"blob".to_vec(), "b", OCTET_STREAM).await.unwrap();
        assert!(second.contains(&response.cid));
        assert!(!first.contains(&response.cid));
    }

    #[tokio::test]
    async fn test_all_failing_is_upload_failed() {
        let first = Arc::new(InMemoryIpfs::named("first"));
        let second = Arc::new(InMemoryIpfs::named("second"));
        first.set_failing(true);
        second.set_failing(true);
        let c = client(&[first, second], &[]);
        match c.upload(vec![1], "a", "b").await {
            Err(IpfsError::UploadFailed(detail)) => {
                assert!(detail.contains("first"));
                assert!(detail.contains("second"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_download_first_success_wins() {
        let broken = Arc::new(InMemoryIpfs::named("broken"));
        let empty = Arc::new(InMemoryIpfs::named("empty"));
        let full = Arc::new(InMemoryIpfs::named("full"));
        broken.set_failing(true);
        let cid = full.insert(b"payload".to_vec());
        let c = client(&[], &[broken, empty, full]);
        assert_eq!(c.download(&cid).await.unwrap(), b"payload");
    }

    #[tokio::test]
    async fn test_download_all_fail() {
        let c = client(&[], &[Arc::new(InMemoryIpfs::new())]);
        let err = c.download(&Cid::from_content(b"nope")).await.unwrap_err();
        assert!(matches!(err, IpfsError::DownloadFailed));
        assert_eq!(err.to_string(), "Failed to download from IPFS");
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Metadata {
        medication: String,
        dosage: String,
    }

    #[tokio::test]
    async fn test_json_roundtrip_through_store() {
        let store = Arc::new(InMemoryIpfs::new());
        let c = client(&[Arc::clone(&store)], &[store]);
        let doc = Metadata {
            medication: "Amoxicillin".into(),
            dosage: "500mg".into(),
        };
        let response = c.upload_json(&doc, "rx.json").await.unwrap();
        let back: Metadata = c.download_json(&response.cid).await.unwrap();
        assert_eq!(back, doc);
    }

    #[tokio::test]
    async fn test_download_json_rejects_garbage() {
        let store = Arc::new(InMemoryIpfs::new());
        let cid = store.insert(b"not json".to_vec());
        let c = client(&[], &[store]);
        assert!(matches!(
            c.download_json::<Metadata>(&cid).await,
            Err(IpfsError::Parse(_))
        ));
    }

    #[test]
    fn test_gateway_url_falls_back_to_ipfs_io() {
        let c = IpfsClient::new(vec![], vec![]);
        let cid = Cid::from_content(b"");
        assert_eq!(c.gateway_url(&cid), format!("https://ipfs.io/ipfs/{cid}"));
    }

    #[test]
    fn test_gateway_url_uses_configured_provider() {
        let config = IpfsConfig {
            pinata_api_key: Some("k".into()),
            pinata_secret_key: Some("s".into()),
            ..IpfsConfig::default()
        };
        let c = IpfsClient::from_config(&config).unwrap();
        let cid = Cid::from_content(b"");
        assert_eq!(
            c.gateway_url(&cid),
            format!("https://gateway.pinata.cloud/ipfs/{cid}")
        );
    }
}
