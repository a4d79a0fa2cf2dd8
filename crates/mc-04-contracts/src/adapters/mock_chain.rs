//! # Mock Chain
//!
//! A contract-aware node simulation on top of [`ScriptedTransport`].
//!
//! - `eth_call` answers come from a table keyed by contract address and
//!   function selector, and can be changed between calls.
//! - Writes go through the normal path (estimate, nonce, sign, send). The
//!   node remembers which function the estimate targeted, so the receipt of
//!   the following `eth_sendRawTransaction` carries the logs registered for
//!   that function.
//! - A function can be made to revert at estimation with a reason string.

use crate::abi::{encode, Abi, AbiError, Token};
use crate::adapters::scripted::ScriptedTransport;
use crate::domain::errors::RpcError;
use crate::domain::rpc::{Log, TransactionReceipt};
use crate::ports::outbound::RpcTransport;
use parking_lot::Mutex;
use serde_json::{json, Value};
use shared_types::{Address, TxHash};
use std::collections::HashMap;
use std::sync::Arc;

type Key = (Address, [u8; 4]);

#[derive(Default)]
struct ChainState {
    calls: HashMap<Key, Vec<u8>>,
    events: HashMap<Key, Vec<Log>>,
    reverts: HashMap<Key, String>,
    estimated: Option<Key>,
    mined: HashMap<String, Key>,
    sent: Vec<Key>,
    nonce: u64,
}

/// Parse `{to, data}` from the first param of a call.
fn call_key(params: &Value) -> Result<Key, RpcError> {
    let invalid = || RpcError::Rpc {
        code: -32602,
        message: "invalid params".into(),
        data: None,
    };
    let call = params.get(0).ok_or_else(invalid)?;
    let to: Address = call["to"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .ok_or_else(invalid)?;
    let data = call["data"].as_str().unwrap_or("0x");
    let bytes = hex::decode(data.trim_start_matches("0x")).map_err(|_| invalid())?;
    let selector: [u8; 4] = bytes
        .get(..4)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(invalid)?;
    Ok((to, selector))
}

fn quantity(value: u64) -> Value {
    json!(format!("0x{value:x}"))
}

/// In-process chain for demos and tests.
#[derive(Clone)]
pub struct MockChain {
    transport: Arc<ScriptedTransport>,
    state: Arc<Mutex<ChainState>>,
}

impl MockChain {
    /// A node on `chain_id` with no contract state.
    #[must_use]
    pub fn new(chain_id: u64) -> Self {
        let transport = Arc::new(ScriptedTransport::new());
        let state = Arc::new(Mutex::new(ChainState::default()));

        transport.respond("eth_chainId", quantity(chain_id));
        transport.respond("eth_blockNumber", quantity(1));
        transport.respond("eth_gasPrice", quantity(1_000_000_000));
        transport.respond("eth_getBalance", json!("0xde0b6b3a7640000"));

        let s = Arc::clone(&state);
        transport.on("eth_getTransactionCount", move |_| Ok(quantity(s.lock().nonce)));

        let s = Arc::clone(&state);
        transport.on("eth_call", move |params| {
            let key = call_key(params)?;
            let out = s.lock().calls.get(&key).cloned().unwrap_or_default();
            Ok(json!(format!("0x{}", hex::encode(out))))
        });

        let s = Arc::clone(&state);
        transport.on("eth_estimateGas", move |params| {
            let key = call_key(params)?;
            let mut state = s.lock();
            if let Some(reason) = state.reverts.get(&key) {
                return Err(RpcError::Rpc {
                    code: 3,
                    message: format!("execution reverted: {reason}"),
                    data: None,
                });
            }
            state.estimated = Some(key);
            Ok(quantity(200_000))
        });

        let s = Arc::clone(&state);
        transport.on("eth_sendRawTransaction", move |params| {
            let raw = params[0].as_str().unwrap_or_default();
            let bytes = hex::decode(raw.trim_start_matches("0x")).unwrap_or_default();
            let hash = TxHash::keccak(&bytes).to_string();
            let mut state = s.lock();
            let key = state.estimated.take().ok_or_else(|| RpcError::Rpc {
                code: -32000,
                message: "transaction was not estimated".into(),
                data: None,
            })?;
            state.nonce += 1;
            state.sent.push(key);
            state.mined.insert(hash.clone(), key);
            Ok(json!(hash))
        });

        let s = Arc::clone(&state);
        transport.on("eth_getTransactionReceipt", move |params| {
            let hash = params[0].as_str().unwrap_or_default().to_string();
            let state = s.lock();
            let Some(key) = state.mined.get(&hash) else {
                return Ok(Value::Null);
            };
            let receipt = TransactionReceipt {
                transaction_hash: hash.parse().unwrap_or_default(),
                block_number: Some(1u64.into()),
                from: None,
                to: Some(key.0),
                gas_used: Some(21_000u64.into()),
                status: Some(1u64.into()),
                logs: state.events.get(key).cloned().unwrap_or_default(),
            };
            serde_json::to_value(receipt).map_err(|e| RpcError::InvalidResponse(e.to_string()))
        });

        Self { transport, state }
    }

    /// The transport to hand to a [`Provider`](crate::provider::Provider).
    #[must_use]
    pub fn transport(&self) -> Arc<dyn RpcTransport> {
        Arc::clone(&self.transport) as Arc<dyn RpcTransport>
    }

    /// The underlying scripted transport, for request inspection.
    #[must_use]
    pub fn scripted(&self) -> &ScriptedTransport {
        &self.transport
    }

    /// Answer calls to `method` on `contract` with `outputs`.
    pub fn answer(
        &self,
        contract: Address,
        abi: &Abi,
        method: &str,
        outputs: Vec<Token>,
    ) -> Result<(), AbiError> {
        let selector = abi.function(method)?.selector();
        self.state
            .lock()
            .calls
            .insert((contract, selector), encode(&outputs));
        Ok(())
    }

    /// Make writes to `method` emit `event` with `args` in their receipt.
    /// Repeated calls append further logs.
    pub fn emit(
        &self,
        contract: Address,
        abi: &Abi,
        method: &str,
        event: &str,
        args: Vec<Token>,
    ) -> Result<(), AbiError> {
        let selector = abi.function(method)?.selector();
        let (topics, data) = abi.event(event)?.encode_log(&args)?;
        self.state
            .lock()
            .events
            .entry((contract, selector))
            .or_default()
            .push(Log {
                address: contract,
                topics,
                data,
                block_number: None,
                transaction_hash: None,
                log_index: None,
            });
        Ok(())
    }

    /// Make writes to `method` revert with `reason`.
    pub fn revert(
        &self,
        contract: Address,
        abi: &Abi,
        method: &str,
        reason: &str,
    ) -> Result<(), AbiError> {
        let selector = abi.function(method)?.selector();
        self.state
            .lock()
            .reverts
            .insert((contract, selector), reason.to_string());
        Ok(())
    }

    /// Number of mined writes to `method` on `contract`.
    pub fn sent_count(
        &self,
        contract: Address,
        abi: &Abi,
        method: &str,
    ) -> Result<usize, AbiError> {
        let key = (contract, abi.function(method)?.selector());
        Ok(self.state.lock().sent.iter().filter(|k| **k == key).count())
    }

    /// Total mined writes.
    #[must_use]
    pub fn sent_total(&self) -> usize {
        self.state.lock().sent.len()
    }
}
