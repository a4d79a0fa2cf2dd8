//! Upload results and content types.

use serde::{Deserialize, Serialize};
use shared_types::Cid;

/// Content type used for encrypted envelopes.
pub const OCTET_STREAM: &str = "application/octet-stream";
/// Content type used for JSON documents.
pub const APPLICATION_JSON: &str = "application/json";

/// Result of a successful pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Content identifier issued by the provider.
    pub cid: Cid,
    /// Gateway URL for the content.
    pub url: String,
}

/// Join a gateway base and a CID into a retrieval URL.
#[must_use]
pub fn gateway_link(base: &str, cid: &Cid) -> String {
    format!("{}/ipfs/{}", base.trim_end_matches('/'), cid)
}
