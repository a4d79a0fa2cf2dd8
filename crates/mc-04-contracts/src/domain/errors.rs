//! # Contract Errors
//!
//! RPC failures are classified into the conditions screens care about:
//! user rejection, insufficient funds, reverts with a reason, and gas
//! estimation failures. [`format_error`] turns any of them into one toast
//! message.

use crate::abi::{decode_revert_reason, AbiError};
use crate::abis::ContractName;
use mc_01_wallet::WalletError;
use shared_types::TxHash;
use thiserror::Error;

/// JSON-RPC transport and protocol errors.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The request never produced a response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The node answered with a JSON-RPC error object.
    #[error("{message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<serde_json::Value>,
    },

    /// The response did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A scripted or local transport has no answer for this method.
    #[error("Method not supported: {0}")]
    Unsupported(String),
}

impl RpcError {
    /// Revert payload carried in `error.data`, if any.
    #[must_use]
    pub fn revert_data(&self) -> Option<Vec<u8>> {
        let Self::Rpc { data: Some(data), .. } = self else {
            return None;
        };
        let hex_str = data
            .as_str()
            .or_else(|| data.get("data").and_then(|d| d.as_str()))?;
        hex::decode(hex_str.strip_prefix("0x").unwrap_or(hex_str)).ok()
    }
}

/// Errors surfaced by contract handles and facades.
#[derive(Debug, Error)]
pub enum ContractError {
    /// No deployed address is configured for this contract.
    #[error("Contract address not found for {0}")]
    AddressNotConfigured(ContractName),

    /// A write was attempted without a signer.
    #[error("Wallet not connected")]
    WalletNotConnected,

    /// The user declined to sign.
    #[error("Transaction rejected by user")]
    UserRejected,

    /// The sender cannot pay for gas and value.
    #[error("Insufficient funds for transaction")]
    InsufficientFunds,

    /// The call or transaction reverted.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// The node could not estimate gas.
    #[error("Gas estimation failed: {0}")]
    GasEstimation(String),

    /// No receipt appeared before the deadline.
    #[error("Transaction {hash} not mined after {waited_secs}s")]
    Timeout { hash: TxHash, waited_secs: u64 },

    /// A confirmed receipt lacks the event a write should have emitted.
    #[error("Event {0} not found in receipt")]
    EventNotFound(String),

    #[error(transparent)]
    Abi(#[from] AbiError),

    #[error(transparent)]
    Rpc(RpcError),

    /// Any other wallet failure.
    #[error("Wallet error: {0}")]
    Wallet(String),
}

impl From<WalletError> for ContractError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::UserRejected => Self::UserRejected,
            WalletError::WalletNotConnected => Self::WalletNotConnected,
            other => Self::Wallet(other.to_string()),
        }
    }
}

impl From<RpcError> for ContractError {
    fn from(e: RpcError) -> Self {
        classify_rpc(e)
    }
}

const EXECUTION_REVERTED: &str = "execution reverted";

/// Map a node error onto the contract error taxonomy.
#[must_use]
pub fn classify_rpc(e: RpcError) -> ContractError {
    if let RpcError::Rpc { message, .. } = &e {
        let lower = message.to_ascii_lowercase();
        if lower.contains("insufficient funds") {
            return ContractError::InsufficientFunds;
        }
        if lower.contains("user denied") || lower.contains("user rejected") {
            return ContractError::UserRejected;
        }
        if let Some(reason) = e.revert_data().as_deref().and_then(decode_revert_reason) {
            return ContractError::Reverted(reason);
        }
        if let Some(rest) = lower.strip_prefix(EXECUTION_REVERTED) {
            let offset = message.len() - rest.len();
            let reason = message[offset..].trim_start_matches(':').trim();
            return ContractError::Reverted(reason.to_string());
        }
    }
    ContractError::Rpc(e)
}

/// Pull `reason="..."` out of a provider message.
fn quoted_reason(message: &str) -> Option<&str> {
    let start = message.find("reason=\"")? + "reason=\"".len();
    let len = message[start..].find('"')?;
    Some(&message[start..start + len])
}

/// One human-readable line for a toast.
#[must_use]
pub fn format_error(e: &ContractError) -> String {
    let message = match e {
        ContractError::UserRejected => return "Transaction rejected by user".into(),
        ContractError::InsufficientFunds => {
            return "Insufficient funds for transaction".into()
        }
        ContractError::Reverted(reason) | ContractError::GasEstimation(reason) => reason.clone(),
        ContractError::Rpc(RpcError::Rpc { message, .. }) => message.clone(),
        other => other.to_string(),
    };
    if let Some(reason) = quoted_reason(&message) {
        return reason.to_string();
    }
    if message.trim().is_empty() {
        return "Transaction failed".into();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::{encode, ERROR_STRING_SELECTOR};

    fn rpc(message: &str, data: Option<serde_json::Value>) -> RpcError {
        RpcError::Rpc {
            code: 3,
            message: message.into(),
            data,
        }
    }

    #[test]
    fn test_revert_data_is_decoded() {
        let mut payload = ERROR_STRING_SELECTOR.to_vec();
        payload.extend(encode(&["Prescription expired".into()]));
        let err = rpc(
            "execution reverted",
            Some(serde_json::Value::String(format!("0x{}", hex::encode(payload)))),
        );
        match classify_rpc(err) {
            ContractError::Reverted(reason) => assert_eq!(reason, "Prescription expired"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_revert_message_without_data() {
        match classify_rpc(rpc("execution reverted: Not authorized", None)) {
            ContractError::Reverted(reason) => assert_eq!(reason, "Not authorized"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_insufficient_funds() {
        let e = classify_rpc(rpc("insufficient funds for gas * price + value", None));
        assert!(matches!(e, ContractError::InsufficientFunds));
        assert_eq!(format_error(&e), "Insufficient funds for transaction");
    }

    #[test]
    fn test_format_user_rejected() {
        let e = ContractError::from(WalletError::UserRejected);
        assert_eq!(format_error(&e), "Transaction rejected by user");
    }

    #[test]
    fn test_format_extracts_quoted_reason() {
        let e = ContractError::Rpc(rpc(
            "call failed (reason=\"Already dispensed\", code=CALL_EXCEPTION)",
            None,
        ));
        assert_eq!(format_error(&e), "Already dispensed");
    }

    #[test]
    fn test_format_falls_back() {
        assert_eq!(
            format_error(&ContractError::Reverted(String::new())),
            "Transaction failed"
        );
        assert_eq!(
            format_error(&ContractError::Rpc(rpc("nonce too low", None))),
            "nonce too low"
        );
        assert_eq!(
            format_error(&ContractError::AddressNotConfigured(ContractName::Governance)),
            "Contract address not found for governance"
        );
    }
}
