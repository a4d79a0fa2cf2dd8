//! # Provider
//!
//! Typed wrappers over the `eth_*` methods the contract layer needs.

use crate::domain::errors::RpcError;
use crate::domain::rpc::{parse_quantity, CallRequest, TransactionReceipt};
use crate::ports::outbound::RpcTransport;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use shared_types::{Address, TxHash, U256};
use std::sync::Arc;

fn fits_u64(value: U256, what: &str) -> Result<u64, RpcError> {
    if value > U256::from(u64::MAX) {
        return Err(RpcError::InvalidResponse(format!("{what} {value} out of range")));
    }
    Ok(value.low_u64())
}

/// Read access to the chain and raw transaction submission.
#[derive(Clone)]
pub struct Provider {
    transport: Arc<dyn RpcTransport>,
}

impl Provider {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &Arc<dyn RpcTransport> {
        &self.transport
    }

    async fn quantity(&self, method: &str, params: Value) -> Result<U256, RpcError> {
        let value = self.transport.request(method, params).await?;
        value
            .as_str()
            .and_then(parse_quantity)
            .ok_or_else(|| {
                RpcError::InvalidResponse(format!("{method}: expected quantity, got {value}"))
            })
    }

    async fn typed<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
        let value = self.transport.request(method, params).await?;
        serde_json::from_value(value)
            .map_err(|e| RpcError::InvalidResponse(format!("{method}: {e}")))
    }

    /// `eth_chainId`.
    pub async fn chain_id(&self) -> Result<u64, RpcError> {
        let id = self.quantity("eth_chainId", json!([])).await?;
        fits_u64(id, "chain id")
    }

    /// `eth_blockNumber`.
    pub async fn block_number(&self) -> Result<u64, RpcError> {
        Ok(self.quantity("eth_blockNumber", json!([])).await?.low_u64())
    }

    /// `eth_call` against the latest block; returns raw return data.
    pub async fn call(&self, request: &CallRequest) -> Result<Vec<u8>, RpcError> {
        let value = self
            .transport
            .request("eth_call", json!([request, "latest"]))
            .await?;
        let hex_str = value.as_str().ok_or_else(|| {
            RpcError::InvalidResponse(format!("eth_call: expected data, got {value}"))
        })?;
        hex::decode(hex_str.strip_prefix("0x").unwrap_or(hex_str))
            .map_err(|e| RpcError::InvalidResponse(format!("eth_call: {e}")))
    }

    /// `eth_estimateGas`.
    pub async fn estimate_gas(&self, request: &CallRequest) -> Result<U256, RpcError> {
        self.quantity("eth_estimateGas", json!([request])).await
    }

    /// `eth_gasPrice`.
    pub async fn gas_price(&self) -> Result<U256, RpcError> {
        self.quantity("eth_gasPrice", json!([])).await
    }

    /// `eth_getTransactionCount` including pending transactions.
    pub async fn transaction_count(&self, address: &Address) -> Result<u64, RpcError> {
        let count = self
            .quantity("eth_getTransactionCount", json!([address, "pending"]))
            .await?;
        fits_u64(count, "nonce")
    }

    /// `eth_getBalance` at the latest block.
    pub async fn balance(&self, address: &Address) -> Result<U256, RpcError> {
        self.quantity("eth_getBalance", json!([address, "latest"])).await
    }

    /// `eth_sendRawTransaction`.
    pub async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash, RpcError> {
        self.typed(
            "eth_sendRawTransaction",
            json!([format!("0x{}", hex::encode(raw))]),
        )
        .await
    }

    /// `eth_getTransactionReceipt`; `None` while pending.
    pub async fn transaction_receipt(
        &self,
        hash: &TxHash,
    ) -> Result<Option<TransactionReceipt>, RpcError> {
        self.typed("eth_getTransactionReceipt", json!([hash])).await
    }
}
