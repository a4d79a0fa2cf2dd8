//! # In-Memory IPFS
//!
//! Content-addressed blob map implementing both ports. CIDs are computed
//! with [`Cid::from_content`], so identical bytes always get the same CID.
//! Used by tests and by the CLI when no provider is configured.

use crate::domain::errors::IpfsError;
use crate::domain::types::{gateway_link, UploadResponse};
use crate::ports::outbound::{ContentSource, PinningService};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::Cid;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Gateway base reported for in-memory content.
pub const MEMORY_GATEWAY: &str = "memory://local";

/// Blob store keyed by CID.
pub struct InMemoryIpfs {
    name: String,
    configured: bool,
    failing: AtomicBool,
    pins: AtomicUsize,
    blobs: RwLock<HashMap<Cid, Vec<u8>>>,
}

impl InMemoryIpfs {
    /// A configured, healthy store.
    #[must_use]
    pub fn new() -> Self {
        Self::named("memory")
    }

    /// A configured store with a specific log name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            configured: true,
            failing: AtomicBool::new(false),
            pins: AtomicUsize::new(0),
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// A store that reports itself unconfigured.
    #[must_use]
    pub fn unconfigured(name: impl Into<String>) -> Self {
        Self {
            configured: false,
            ..Self::named(name)
        }
    }

    /// Make every pin and fetch fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful pins.
    #[must_use]
    pub fn pin_count(&self) -> usize {
        self.pins.load(Ordering::SeqCst)
    }

    /// Whether `cid` is held.
    #[must_use]
    pub fn contains(&self, cid: &Cid) -> bool {
        self.blobs.read().contains_key(cid)
    }

    /// Store bytes directly and return their CID.
    pub fn insert(&self, data: Vec<u8>) -> Cid {
        let cid = Cid::from_content(&data);
        self.blobs.write().insert(cid.clone(), data);
        cid
    }

    fn check_failing(&self) -> Result<(), IpfsError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(IpfsError::Status {
                service: self.name.clone(),
                status: 503,
                body: "unavailable".into(),
            });
        }
        Ok(())
    }
}

impl Default for InMemoryIpfs {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PinningService for InMemoryIpfs {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    fn gateway_base(&self) -> &str {
        MEMORY_GATEWAY
    }

    async fn pin(
        &self,
        data: Vec<u8>,
        _file_name: &str,
        _content_type: &str,
    ) -> Result<UploadResponse, IpfsError> {
        self.check_failing()?;
        let cid = self.insert(data);
        self.pins.fetch_add(1, Ordering::SeqCst);
        Ok(UploadResponse {
            url: gateway_link(MEMORY_GATEWAY, &cid),
            cid,
        })
    }
}

#[async_trait]
impl ContentSource for InMemoryIpfs {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, cid: &Cid) -> Result<Vec<u8>, IpfsError> {
        self.check_failing()?;
        self.blobs
            .read()
            .get(cid)
            .cloned()
            .ok_or_else(|| IpfsError::NotFound(cid.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pin_then_fetch() {
        let store = InMemoryIpfs::new();
        let response = store.pin(b"record".to_vec(), "r.bin", "x").await.unwrap();
        assert_eq!(response.cid, Cid::from_content(b"record"));
        assert_eq!(store.fetch(&response.cid).await.unwrap(), b"record");
        assert_eq!(store.pin_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_content() {
        let store = InMemoryIpfs::new();
        let cid = Cid::from_content(b"absent");
        assert!(matches!(store.fetch(&cid).await, Err(IpfsError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_failing_store() {
        let store = InMemoryIpfs::new();
        store.set_failing(true);
        assert!(store.pin(vec![1], "a", "b").await.is_err());
        store.set_failing(false);
        assert!(store.pin(vec![1], "a", "b").await.is_ok());
    }
}
