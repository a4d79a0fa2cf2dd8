//! web3.storage pinning over its upload endpoint.

use super::{check_status, http_client};
use crate::domain::config::non_empty;
use crate::domain::errors::IpfsError;
use crate::domain::types::{gateway_link, UploadResponse};
use crate::ports::outbound::PinningService;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use shared_types::Cid;
use std::time::Duration;
use tracing::debug;

/// Upload endpoint.
pub const WEB3_STORAGE_ENDPOINT: &str = "https://api.web3.storage/upload";
/// Gateway for content pinned on web3.storage.
pub const WEB3_STORAGE_GATEWAY: &str = "https://w3s.link";

#[derive(Debug, Deserialize)]
struct UploadReply {
    cid: String,
}

/// Pins through web3.storage with a bearer token.
pub struct Web3StorageService {
    client: Client,
    token: Option<String>,
    endpoint: String,
}

impl Web3StorageService {
    /// Build with an optional token. A missing token leaves the service
    /// unconfigured.
    pub fn new(token: Option<String>, timeout: Duration) -> Result<Self, IpfsError> {
        Ok(Self {
            client: http_client(timeout)?,
            token,
            endpoint: WEB3_STORAGE_ENDPOINT.to_string(),
        })
    }

    /// Point at another upload endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl PinningService for Web3StorageService {
    fn name(&self) -> &str {
        "web3.storage"
    }

    fn is_configured(&self) -> bool {
        non_empty(&self.token)
    }

    fn gateway_base(&self) -> &str {
        WEB3_STORAGE_GATEWAY
    }

    async fn pin(
        &self,
        data: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<UploadResponse, IpfsError> {
        let token = self.token.as_deref().ok_or(IpfsError::NotConfigured)?;
        let len = data.len();
        let part = Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        let reply: UploadReply = check_status(self.name(), response)
            .await?
            .json()
            .await
            .map_err(|e| IpfsError::Parse(e.to_string()))?;

        let cid = Cid::parse(&reply.cid)?;
        debug!(cid = %cid, len, "Pinned on web3.storage");
        Ok(UploadResponse {
            url: gateway_link(WEB3_STORAGE_GATEWAY, &cid),
            cid,
        })
    }
}
