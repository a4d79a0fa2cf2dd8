//! # Outbound Ports (Driven Ports / SPI)
//!
//! The node connection. Everything above it speaks `eth_*` methods with JSON
//! parameters and results.

use crate::domain::errors::RpcError;
use async_trait::async_trait;
use serde_json::Value;

/// A JSON-RPC 2.0 connection to an Ethereum-compatible node.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Send one request and return its `result`.
    ///
    /// # Errors
    /// * `RpcError::Rpc` - the node returned an error object
    /// * `RpcError::Http` - the request failed in transit
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError>;
}
