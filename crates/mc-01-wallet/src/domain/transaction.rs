//! # Transaction Requests
//!
//! Legacy (type-0) transactions with EIP-155 replay protection. The signing
//! payload is `rlp([nonce, gasPrice, gas, to, value, data, chainId, 0, 0])`;
//! the signed envelope replaces the trailing triple with `[v, r, s]` where
//! `v = chainId * 2 + 35 + recid`.

use super::signature::Signature;
use rlp::RlpStream;
use sha3::{Digest, Keccak256};
use shared_types::{Address, TxHash, U256};

/// A fully populated transaction awaiting a signature.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransactionRequest {
    /// Sender account nonce.
    pub nonce: u64,
    /// Price per gas unit in wei.
    pub gas_price: U256,
    /// Gas limit.
    pub gas_limit: U256,
    /// Recipient; `None` deploys a contract.
    pub to: Option<Address>,
    /// Value transferred in wei.
    pub value: U256,
    /// Call data.
    pub data: Vec<u8>,
    /// Chain the transaction is valid on.
    pub chain_id: u64,
}

impl TransactionRequest {
    fn append_body(&self, stream: &mut RlpStream) {
        stream.append(&self.nonce);
        stream.append(&self.gas_price);
        stream.append(&self.gas_limit);
        match &self.to {
            Some(to) => stream.append(&to.as_bytes().to_vec()),
            None => stream.append(&""),
        };
        stream.append(&self.value);
        stream.append(&self.data);
    }

    /// Hash the signer commits to.
    #[must_use]
    pub fn signing_hash(&self) -> [u8; 32] {
        let mut stream = RlpStream::new_list(9);
        self.append_body(&mut stream);
        stream.append(&self.chain_id);
        stream.append(&0u8);
        stream.append(&0u8);
        Keccak256::digest(stream.as_raw()).into()
    }

    /// RLP-encode the signed transaction for `eth_sendRawTransaction`.
    #[must_use]
    pub fn encode_signed(&self, signature: &Signature) -> Vec<u8> {
        let v = self.chain_id * 2 + 35 + u64::from(signature.recovery_id());
        let mut stream = RlpStream::new_list(9);
        self.append_body(&mut stream);
        stream.append(&v);
        stream.append(&U256::from_big_endian(&signature.r));
        stream.append(&U256::from_big_endian(&signature.s));
        stream.out().to_vec()
    }
}

/// Hash of a raw signed transaction, as reported by the node.
#[must_use]
pub fn raw_transaction_hash(raw: &[u8]) -> TxHash {
    TxHash::keccak(raw)
}
