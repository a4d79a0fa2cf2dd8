//! # JSON-RPC Shapes
//!
//! Request and response objects for the `eth_*` methods the client calls.
//! Quantities are `0x`-prefixed hex, byte strings are `0x`-prefixed hex.

use primitive_types::H256;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use shared_types::{Address, TxHash, U256};

/// `0x`-hex byte string serde.
pub mod hex_bytes {
    use super::*;

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        hex::decode(s).map_err(de::Error::custom)
    }
}

/// Format a `u64` as a JSON-RPC quantity.
#[must_use]
pub fn quantity(value: u64) -> String {
    format!("0x{value:x}")
}

/// Parse a JSON-RPC quantity string.
pub fn parse_quantity(s: &str) -> Option<U256> {
    let digits = s.strip_prefix("0x")?;
    if digits.is_empty() {
        return Some(U256::zero());
    }
    U256::from_str_radix(digits, 16).ok()
}

/// Call object for `eth_call` and `eth_estimateGas`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(with = "hex_bytes")]
    pub data: Vec<u8>,
}

/// A log entry from a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub address: Address,
    pub topics: Vec<H256>,
    #[serde(with = "hex_bytes")]
    pub data: Vec<u8>,
    #[serde(default)]
    pub block_number: Option<U256>,
    #[serde(default)]
    pub transaction_hash: Option<TxHash>,
    #[serde(default)]
    pub log_index: Option<U256>,
}

/// A mined transaction's receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: TxHash,
    #[serde(default)]
    pub block_number: Option<U256>,
    #[serde(default)]
    pub from: Option<Address>,
    #[serde(default)]
    pub to: Option<Address>,
    #[serde(default)]
    pub gas_used: Option<U256>,
    /// `0x1` success, `0x0` reverted; absent on pre-Byzantium chains.
    #[serde(default)]
    pub status: Option<U256>,
    #[serde(default)]
    pub logs: Vec<Log>,
}

impl TransactionReceipt {
    /// True unless the receipt reports status 0.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.map_or(true, |s| !s.is_zero())
    }
}
