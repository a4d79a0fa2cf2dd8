//! # Outbound Ports (Driven Ports / SPI)
//!
//! Pinning providers accept uploads; content sources serve them back. The
//! client holds ordered lists of each and falls through on failure.

use crate::domain::errors::IpfsError;
use crate::domain::types::UploadResponse;
use async_trait::async_trait;
use shared_types::Cid;

/// A service that stores a blob and returns its CID.
#[async_trait]
pub trait PinningService: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// False when credentials are missing; unconfigured services are skipped.
    fn is_configured(&self) -> bool;

    /// Gateway base used to build links for content pinned here.
    fn gateway_base(&self) -> &str;

    /// Upload `data` under `file_name`.
    async fn pin(
        &self,
        data: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<UploadResponse, IpfsError>;
}

/// A place content can be fetched from by CID.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Fetch the blob for `cid`.
    async fn fetch(&self, cid: &Cid) -> Result<Vec<u8>, IpfsError>;
}
