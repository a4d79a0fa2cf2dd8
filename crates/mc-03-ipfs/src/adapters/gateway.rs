//! Read-only retrieval through a public HTTP gateway.

use super::{check_status, http_client};
use crate::domain::errors::IpfsError;
use crate::domain::types::gateway_link;
use crate::ports::outbound::ContentSource;
use async_trait::async_trait;
use reqwest::Client;
use shared_types::Cid;
use std::time::Duration;

/// Fetches `{base}/ipfs/{cid}`.
pub struct HttpGateway {
    client: Client,
    base: String,
}

impl HttpGateway {
    /// Gateway at `base` with a per-request timeout.
    pub fn new(base: impl Into<String>, timeout: Duration) -> Result<Self, IpfsError> {
        Ok(Self {
            client: http_client(timeout)?,
            base: base.into(),
        })
    }

    /// Base URL of this gateway.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }
}

#[async_trait]
impl ContentSource for HttpGateway {
    fn name(&self) -> &str {
        &self.base
    }

    async fn fetch(&self, cid: &Cid) -> Result<Vec<u8>, IpfsError> {
        let response = self.client.get(gateway_link(&self.base, cid)).send().await?;
        let bytes = check_status(&self.base, response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}
