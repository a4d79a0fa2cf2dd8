//! # IPFS Configuration
//!
//! Credentials for the pinning providers and the ordered gateway list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Gateways tried in order when downloading.
pub const DEFAULT_GATEWAYS: [&str; 4] = [
    "https://w3s.link",
    "https://gateway.pinata.cloud",
    "https://ipfs.io",
    "https://cloudflare-ipfs.com",
];

/// Gateway used for links when no provider is configured.
pub const FALLBACK_GATEWAY: &str = "https://ipfs.io";

/// Per-gateway download timeout.
pub const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 10;

/// Upload timeout per provider.
pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 60;

/// Pinning credentials and retrieval settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpfsConfig {
    /// Bearer token for web3.storage.
    pub web3_storage_token: Option<String>,
    /// Pinata API key.
    pub pinata_api_key: Option<String>,
    /// Pinata API secret.
    pub pinata_secret_key: Option<String>,
    /// Gateway base URLs, tried in order.
    pub gateways: Vec<String>,
    /// Download timeout per gateway.
    pub gateway_timeout_secs: u64,
    /// Upload timeout per provider.
    pub upload_timeout_secs: u64,
}

impl Default for IpfsConfig {
    fn default() -> Self {
        Self {
            web3_storage_token: None,
            pinata_api_key: None,
            pinata_secret_key: None,
            gateways: DEFAULT_GATEWAYS.iter().map(|g| (*g).to_string()).collect(),
            gateway_timeout_secs: DEFAULT_GATEWAY_TIMEOUT_SECS,
            upload_timeout_secs: DEFAULT_UPLOAD_TIMEOUT_SECS,
        }
    }
}

impl IpfsConfig {
    /// True when at least one provider has credentials.
    #[must_use]
    pub fn has_provider(&self) -> bool {
        non_empty(&self.web3_storage_token)
            || (non_empty(&self.pinata_api_key) && non_empty(&self.pinata_secret_key))
    }
}

pub(crate) fn non_empty(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl fmt::Debug for IpfsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |v: &Option<String>| if non_empty(v) { "<set>" } else { "<unset>" };
        f.debug_struct("IpfsConfig")
            .field("web3_storage_token", &mask(&self.web3_storage_token))
            .field("pinata_api_key", &mask(&self.pinata_api_key))
            .field("pinata_secret_key", &mask(&self.pinata_secret_key))
            .field("gateways", &self.gateways)
            .field("gateway_timeout_secs", &self.gateway_timeout_secs)
            .field("upload_timeout_secs", &self.upload_timeout_secs)
            .finish()
    }
}
