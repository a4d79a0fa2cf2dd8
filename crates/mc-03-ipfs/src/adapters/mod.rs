//! Adapters layer: HTTP providers, HTTP gateways, and an in-memory store.

pub mod gateway;
pub mod memory;
pub mod pinata;
pub mod web3_storage;

pub use gateway::HttpGateway;
pub use memory::InMemoryIpfs;
pub use pinata::PinataService;
pub use web3_storage::Web3StorageService;

use crate::domain::errors::IpfsError;
use reqwest::{Client, Response};
use std::time::Duration;

/// Connect timeout shared by every HTTP adapter.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) fn http_client(timeout: Duration) -> Result<Client, IpfsError> {
    Ok(Client::builder()
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?)
}

/// Turn a non-2xx response into [`IpfsError::Status`].
pub(crate) async fn check_status(service: &str, response: Response) -> Result<Response, IpfsError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(IpfsError::Status {
        service: service.to_string(),
        status: status.as_u16(),
        body,
    })
}
