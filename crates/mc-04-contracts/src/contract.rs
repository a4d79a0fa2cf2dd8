//! # Contract Handles
//!
//! A [`ContractHandle`] binds one deployed contract to a provider and, for
//! writes, a signer. Handles are cheap and are rebuilt whenever the session
//! changes.
//!
//! ## Write Path
//!
//! ```text
//! encode ─► estimateGas ×1.2 ─► gasPrice ─► nonce(pending) ─► sign ─► sendRawTransaction
//! ```
//!
//! Writes are not serialized: two concurrent writes from one account may
//! read the same pending nonce.

use crate::abi::{Abi, DecodedLog, Token};
use crate::abis::ContractName;
use crate::domain::errors::{classify_rpc, format_error, ContractError};
use crate::domain::rpc::{CallRequest, TransactionReceipt};
use crate::provider::Provider;
use mc_01_wallet::{Signer, TransactionRequest};
use shared_types::{Address, TxHash, U256};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument};

/// Default receipt polling interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Default time to wait for a receipt.
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Node estimate plus 20%, never below the estimate itself.
#[must_use]
pub fn with_gas_buffer(estimate: U256) -> U256 {
    let buffered = estimate.saturating_mul(U256::from(120u64)) / U256::from(100u64);
    buffered.max(estimate)
}

/// A deployed contract bound to a provider and optional signer.
#[derive(Clone)]
pub struct ContractHandle {
    name: ContractName,
    address: Address,
    abi: Arc<Abi>,
    provider: Provider,
    signer: Option<Arc<dyn Signer>>,
    poll_interval: Duration,
    confirmation_timeout: Duration,
}

impl std::fmt::Debug for ContractHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractHandle")
            .field("name", &self.name)
            .field("address", &self.address)
            .field("signer", &self.signer.as_ref().map(|s| s.address()))
            .finish()
    }
}

impl ContractHandle {
    pub fn new(
        name: ContractName,
        address: Address,
        abi: Arc<Abi>,
        provider: Provider,
        signer: Option<Arc<dyn Signer>>,
    ) -> Self {
        Self {
            name,
            address,
            abi,
            provider,
            signer,
            poll_interval: DEFAULT_POLL_INTERVAL,
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
        }
    }

    /// Override receipt polling for transactions sent through this handle.
    #[must_use]
    pub fn with_confirmation(mut self, poll_interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.confirmation_timeout = timeout;
        self
    }

    #[must_use]
    pub fn name(&self) -> ContractName {
        self.name
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn abi(&self) -> &Abi {
        &self.abi
    }

    /// Account that signs writes, if any.
    #[must_use]
    pub fn signer_address(&self) -> Option<Address> {
        self.signer.as_ref().map(|s| s.address())
    }

    fn call_request(&self, data: Vec<u8>) -> CallRequest {
        CallRequest {
            from: self.signer_address(),
            to: Some(self.address),
            data,
            ..CallRequest::default()
        }
    }

    /// Run a read-only call and decode its return values.
    #[instrument(skip(self, args), fields(contract = %self.name))]
    pub async fn read(&self, method: &str, args: &[Token]) -> Result<Vec<Token>, ContractError> {
        let function = self.abi.function(method)?;
        let request = self.call_request(function.encode_input(args)?);
        let output = self.provider.call(&request).await.map_err(classify_rpc)?;
        Ok(function.decode_output(&output)?)
    }

    /// Read a method that returns a single value.
    pub async fn read_one(&self, method: &str, args: &[Token]) -> Result<Token, ContractError> {
        self.read(method, args)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                ContractError::Abi(crate::abi::AbiError::InvalidData(format!(
                    "{method} returned nothing"
                )))
            })
    }

    /// Gas needed for `method`, with the 20% buffer applied.
    pub async fn estimate_gas(&self, method: &str, args: &[Token]) -> Result<U256, ContractError> {
        let function = self.abi.function(method)?;
        let request = self.call_request(function.encode_input(args)?);
        self.estimate(&request).await
    }

    async fn estimate(&self, request: &CallRequest) -> Result<U256, ContractError> {
        let raw = self
            .provider
            .estimate_gas(request)
            .await
            .map_err(|e| match classify_rpc(e) {
                ContractError::InsufficientFunds => ContractError::InsufficientFunds,
                ContractError::UserRejected => ContractError::UserRejected,
                other => ContractError::GasEstimation(format_error(&other)),
            })?;
        Ok(with_gas_buffer(raw))
    }

    /// Sign and submit a state-changing call. Confirmation is awaited
    /// separately through the returned [`PendingTransaction`].
    ///
    /// # Errors
    /// * `ContractError::WalletNotConnected` - the handle has no signer
    /// * `ContractError::UserRejected` - the user declined to sign
    /// * `ContractError::GasEstimation` - the node could not estimate gas
    #[instrument(skip(self, args), fields(contract = %self.name))]
    pub async fn write(
        &self,
        method: &str,
        args: &[Token],
    ) -> Result<PendingTransaction, ContractError> {
        let signer = self.signer.as_ref().ok_or(ContractError::WalletNotConnected)?;
        let function = self.abi.function(method)?;
        let data = function.encode_input(args)?;
        let request = self.call_request(data.clone());

        let gas_limit = self.estimate(&request).await?;
        let gas_price = self.provider.gas_price().await?;
        let nonce = self.provider.transaction_count(&signer.address()).await?;
        let chain_id = self.provider.chain_id().await?;

        let tx = TransactionRequest {
            nonce,
            gas_price,
            gas_limit,
            to: Some(self.address),
            value: U256::zero(),
            data,
            chain_id,
        };
        let raw = signer.sign_transaction(&tx).await?;
        let hash = self.provider.send_raw_transaction(&raw).await?;
        info!(method, hash = %hash, nonce, "Transaction submitted");

        Ok(PendingTransaction {
            hash,
            provider: self.provider.clone(),
            poll_interval: self.poll_interval,
            timeout: self.confirmation_timeout,
        })
    }

    /// Decode this contract's logs in a receipt; foreign or unknown logs are
    /// skipped.
    #[must_use]
    pub fn decode_logs(&self, receipt: &TransactionReceipt) -> Vec<DecodedLog> {
        receipt
            .logs
            .iter()
            .filter(|log| log.address == self.address)
            .filter_map(|log| {
                let event = self.abi.event_by_topic(log.topics.first()?)?;
                match event.decode_log(&log.topics, &log.data) {
                    Ok(decoded) => Some(decoded),
                    Err(e) => {
                        debug!(event = %event.name, error = %e, "Skipping undecodable log");
                        None
                    }
                }
            })
            .collect()
    }

    /// First log of `event` in a receipt.
    #[must_use]
    pub fn find_event(&self, receipt: &TransactionReceipt, event: &str) -> Option<DecodedLog> {
        self.decode_logs(receipt).into_iter().find(|l| l.name == event)
    }
}

/// A submitted transaction awaiting its receipt.
#[derive(Clone)]
pub struct PendingTransaction {
    hash: TxHash,
    provider: Provider,
    poll_interval: Duration,
    timeout: Duration,
}

impl std::fmt::Debug for PendingTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingTransaction")
            .field("hash", &self.hash)
            .field("poll_interval", &self.poll_interval)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl PendingTransaction {
    #[must_use]
    pub fn hash(&self) -> TxHash {
        self.hash
    }

    /// Poll until the receipt appears.
    ///
    /// # Errors
    /// * `ContractError::Reverted` - the receipt has status 0
    /// * `ContractError::Timeout` - no receipt before the deadline
    #[instrument(skip(self), fields(hash = %self.hash))]
    pub async fn wait(&self) -> Result<TransactionReceipt, ContractError> {
        let started = Instant::now();
        loop {
            if let Some(receipt) = self.provider.transaction_receipt(&self.hash).await? {
                if !receipt.is_success() {
                    return Err(ContractError::Reverted("Transaction reverted".into()));
                }
                debug!(block = ?receipt.block_number, "Transaction confirmed");
                return Ok(receipt);
            }
            if started.elapsed() >= self.timeout {
                return Err(ContractError::Timeout {
                    hash: self.hash,
                    waited_secs: self.timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::{encode, ERROR_STRING_SELECTOR};
    use crate::abis::GOVERNANCE_ABI;
    use crate::adapters::ScriptedTransport;
    use crate::domain::errors::RpcError;
    use crate::domain::rpc::Log;
    use mc_01_wallet::LocalWallet;
    use primitive_types::H256;
    use serde_json::json;

    const GOV: Address = Address::new([0x60; 20]);

    fn handle(signed: bool) -> (Arc<ScriptedTransport>, ContractHandle) {
        let t = Arc::new(ScriptedTransport::new());
        let abi = Arc::new(Abi::parse(GOVERNANCE_ABI).unwrap());
        let signer: Option<Arc<dyn Signer>> = if signed {
            Some(Arc::new(LocalWallet::from_bytes(&[0x42; 32]).unwrap()))
        } else {
            None
        };
        let h = ContractHandle::new(
            ContractName::Governance,
            GOV,
            abi,
            Provider::new(Arc::clone(&t) as Arc<dyn crate::ports::outbound::RpcTransport>),
            signer,
        )
        .with_confirmation(Duration::from_millis(1), Duration::from_millis(20));
        (t, h)
    }

    fn script_write_path(t: &ScriptedTransport) {
        t.respond("eth_estimateGas", json!("0x186a0"));
        t.respond("eth_gasPrice", json!("0x3b9aca00"));
        t.respond("eth_getTransactionCount", json!("0x7"));
        t.respond("eth_chainId", json!("0x13881"));
        t.on("eth_sendRawTransaction", |params| {
            let raw = params[0].as_str().unwrap_or_default();
            let bytes = hex::decode(raw.trim_start_matches("0x")).unwrap_or_default();
            Ok(json!(TxHash::keccak(&bytes).to_string()))
        });
    }

    #[test]
    fn test_gas_buffer() {
        assert_eq!(with_gas_buffer(U256::from(100_000u64)), U256::from(120_000u64));
        assert_eq!(with_gas_buffer(U256::from(1u64)), U256::from(1u64));
        assert_eq!(with_gas_buffer(U256::zero()), U256::zero());
        assert_eq!(with_gas_buffer(U256::MAX), U256::MAX);
        for raw in [21_000u64, 99_999, 123_457] {
            assert!(with_gas_buffer(U256::from(raw)) >= U256::from(raw));
        }
    }

    #[tokio::test]
    async fn test_read_decodes_output() {
        let (t, h) = handle(false);
        t.respond(
            "eth_call",
            json!(format!("0x{}", hex::encode(encode(&[Token::from(3u64)])))),
        );
        let state = h
            .read_one("getProposalState", &[Token::from(1u64)])
            .await
            .unwrap();
        assert_eq!(state, Token::from(3u64));
        let (_, params) = &t.requests()[0];
        assert_eq!(params[0]["to"], GOV.to_string());
    }

    #[tokio::test]
    async fn test_read_revert_reason() {
        let (t, h) = handle(false);
        let mut payload = ERROR_STRING_SELECTOR.to_vec();
        payload.extend(encode(&["Proposal not found".into()]));
        let data = format!("0x{}", hex::encode(payload));
        t.on("eth_call", move |_| {
            Err(RpcError::Rpc {
                code: 3,
                message: "execution reverted".into(),
                data: Some(json!(data.clone())),
            })
        });
        match h.read("getProposal", &[Token::from(9u64)]).await {
            Err(ContractError::Reverted(reason)) => assert_eq!(reason, "Proposal not found"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_write_without_signer() {
        let (_, h) = handle(false);
        assert!(matches!(
            h.write("vote", &[Token::from(1u64), Token::Bool(true)]).await,
            Err(ContractError::WalletNotConnected)
        ));
    }

    #[tokio::test]
    async fn test_estimate_gas_applies_buffer() {
        let (t, h) = handle(false);
        t.respond("eth_estimateGas", json!("0x186a0"));
        let gas = h
            .estimate_gas("vote", &[Token::from(1u64), Token::Bool(true)])
            .await
            .unwrap();
        assert_eq!(gas, U256::from(120_000u64));
    }

    #[tokio::test]
    async fn test_estimate_failure_is_gas_estimation() {
        let (t, h) = handle(false);
        t.on("eth_estimateGas", |_| {
            Err(RpcError::Rpc {
                code: -32000,
                message: "execution reverted: Already voted".into(),
                data: None,
            })
        });
        match h.estimate_gas("vote", &[Token::from(1u64), Token::Bool(true)]).await {
            Err(ContractError::GasEstimation(reason)) => assert_eq!(reason, "Already voted"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_write_signs_and_sends() {
        let (t, h) = handle(true);
        script_write_path(&t);
        let pending = h
            .write("vote", &[Token::from(1u64), Token::Bool(true)])
            .await
            .unwrap();

        let sent = t
            .requests()
            .into_iter()
            .find(|(m, _)| m == "eth_sendRawTransaction")
            .unwrap();
        let raw = hex::decode(sent.1[0].as_str().unwrap().trim_start_matches("0x")).unwrap();
        assert_eq!(pending.hash(), TxHash::keccak(&raw));
        assert_eq!(t.count("eth_estimateGas"), 1);
    }

    #[tokio::test]
    async fn test_wait_success_and_logs() {
        let (t, h) = handle(true);
        script_write_path(&t);
        let event = h.abi().event("ProposalCreated").unwrap().clone();
        let mut id_topic = [0u8; 32];
        id_topic[31] = 4;
        let mut proposer = [0u8; 32];
        proposer[12..].copy_from_slice(&[0x42; 20]);
        let receipt = TransactionReceipt {
            transaction_hash: TxHash::default(),
            block_number: Some(U256::from(10u64)),
            from: None,
            to: Some(GOV),
            gas_used: None,
            status: Some(U256::one()),
            logs: vec![
                Log {
                    address: GOV,
                    topics: vec![event.topic(), H256(id_topic), H256(proposer)],
                    data: vec![],
                    block_number: None,
                    transaction_hash: None,
                    log_index: None,
                },
                Log {
                    address: Address::new([0x01; 20]),
                    topics: vec![event.topic(), H256(id_topic), H256(proposer)],
                    data: vec![],
                    block_number: None,
                    transaction_hash: None,
                    log_index: None,
                },
            ],
        };
        let receipt_json = serde_json::to_value(&receipt).unwrap();
        t.respond("eth_getTransactionReceipt", receipt_json);

        let pending = h.write("createProposal", &["Fund audits".into()]).await.unwrap();
        let mined = pending.wait().await.unwrap();
        let logs = h.decode_logs(&mined);
        assert_eq!(logs.len(), 1);
        let created = h.find_event(&mined, "ProposalCreated").unwrap();
        assert_eq!(created.get("proposalId"), Some(&Token::from(4u64)));
    }

    #[tokio::test]
    async fn test_wait_reverted() {
        let (t, h) = handle(true);
        script_write_path(&t);
        t.respond(
            "eth_getTransactionReceipt",
            json!({ "transactionHash": format!("0x{}", "00".repeat(32)), "status": "0x0" }),
        );
        let pending = h.write("executeProposal", &[Token::from(1u64)]).await.unwrap();
        assert!(matches!(pending.wait().await, Err(ContractError::Reverted(_))));
    }

    #[tokio::test]
    async fn test_wait_times_out() {
        let (t, h) = handle(true);
        script_write_path(&t);
        t.respond("eth_getTransactionReceipt", serde_json::Value::Null);
        let pending = h.write("cancelProposal", &[Token::from(1u64)]).await.unwrap();
        assert!(matches!(pending.wait().await, Err(ContractError::Timeout { .. })));
        assert!(t.count("eth_getTransactionReceipt") >= 2);
    }
}
