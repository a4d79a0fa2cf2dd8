//! Pinata pinning over `pinFileToIPFS`.

use super::{check_status, http_client};
use crate::domain::config::non_empty;
use crate::domain::errors::IpfsError;
use crate::domain::types::{gateway_link, UploadResponse};
use crate::ports::outbound::PinningService;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use shared_types::Cid;
use std::time::Duration;
use tracing::debug;

/// Upload endpoint.
pub const PINATA_ENDPOINT: &str = "https://api.pinata.cloud/pinning/pinFileToIPFS";
/// Gateway for content pinned on Pinata.
pub const PINATA_GATEWAY: &str = "https://gateway.pinata.cloud";

#[derive(Debug, Deserialize)]
struct PinReply {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

/// Pins through Pinata with an API key and secret.
pub struct PinataService {
    client: Client,
    api_key: Option<String>,
    secret_key: Option<String>,
    endpoint: String,
}

impl PinataService {
    /// Build with optional credentials. Both are needed to be configured.
    pub fn new(
        api_key: Option<String>,
        secret_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, IpfsError> {
        Ok(Self {
            client: http_client(timeout)?,
            api_key,
            secret_key,
            endpoint: PINATA_ENDPOINT.to_string(),
        })
    }

    /// Point at another upload endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// The `pinataMetadata` form field.
fn metadata_field(file_name: &str) -> String {
    json!({
        "name": file_name,
        "keyvalues": {
            "type": "medical-record",
            "timestamp": Utc::now().to_rfc3339(),
        }
    })
    .to_string()
}

#[async_trait]
impl PinningService for PinataService {
    fn name(&self) -> &str {
        "pinata"
    }

    fn is_configured(&self) -> bool {
        non_empty(&self.api_key) && non_empty(&self.secret_key)
    }

    fn gateway_base(&self) -> &str {
        PINATA_GATEWAY
    }

    async fn pin(
        &self,
        data: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<UploadResponse, IpfsError> {
        let (Some(api_key), Some(secret_key)) =
            (self.api_key.as_deref(), self.secret_key.as_deref())
        else {
            return Err(IpfsError::NotConfigured);
        };

        let len = data.len();
        let part = Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = Form::new()
            .part("file", part)
            .text("pinataMetadata", metadata_field(file_name))
            .text("pinataOptions", json!({ "cidVersion": 1 }).to_string());

        let response = self
            .client
            .post(&self.endpoint)
            .header("pinata_api_key", api_key)
            .header("pinata_secret_api_key", secret_key)
            .multipart(form)
            .send()
            .await?;
        let reply: PinReply = check_status(self.name(), response)
            .await?
            .json()
            .await
            .map_err(|e| IpfsError::Parse(e.to_string()))?;

        let cid = Cid::parse(&reply.ipfs_hash)?;
        debug!(cid = %cid, len, "Pinned on Pinata");
        Ok(UploadResponse {
            url: gateway_link(PINATA_GATEWAY, &cid),
            cid,
        })
    }
}
