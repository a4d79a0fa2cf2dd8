//! IPFS error types.

use shared_types::{Cid, TypeError};
use thiserror::Error;

/// Errors from pinning and retrieval.
#[derive(Debug, Error)]
pub enum IpfsError {
    /// No pinning provider has credentials.
    #[error("No IPFS service configured")]
    NotConfigured,

    /// Every configured provider failed.
    #[error("Failed to upload to IPFS: {0}")]
    UploadFailed(String),

    /// Every gateway failed.
    #[error("Failed to download from IPFS")]
    DownloadFailed,

    /// A single provider or gateway answered with a non-success status.
    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: String,
        status: u16,
        body: String,
    },

    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A response or downloaded blob could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A provider returned something that is not a CID.
    #[error("Invalid CID: {0}")]
    InvalidCid(#[from] TypeError),

    /// Content is not held by this source.
    #[error("Content not found: {0}")]
    NotFound(Cid),
}

impl IpfsError {
    /// True for the aggregate errors surfaced to screens.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::NotConfigured | Self::UploadFailed(_) | Self::DownloadFailed
        )
    }
}
