//! # Local Wallet (secp256k1)
//!
//! An in-process signer holding one private key.
//!
//! ## Properties
//!
//! - RFC 6979 deterministic nonces: the same key signing the same message
//!   always yields the same signature. Key derivation in the encryption
//!   pipeline depends on this.
//! - Low-S signatures with `v ∈ {27, 28}`.
//! - Key material is zeroized on drop.

use crate::domain::errors::WalletError;
use crate::domain::signature::{address_of, hash_message, Signature};
use crate::domain::transaction::TransactionRequest;
use crate::ports::outbound::Signer;
use async_trait::async_trait;
use k256::ecdsa::SigningKey;
use shared_types::Address;
use std::fmt;
use tracing::debug;
use zeroize::Zeroizing;

/// A signer backed by a private key held in memory.
pub struct LocalWallet {
    signing_key: SigningKey,
    address: Address,
}

impl LocalWallet {
    /// Generate a random wallet.
    #[must_use]
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::random(&mut rand::thread_rng()))
    }

    /// Create from secret key bytes (32 bytes).
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, WalletError> {
        let signing_key = SigningKey::from_bytes(bytes.into())
            .map_err(|_| WalletError::InvalidKey("scalar out of range".into()))?;
        Ok(Self::from_signing_key(signing_key))
    }

    /// Create from a hex private key, with or without `0x`.
    pub fn from_hex(key: &str) -> Result<Self, WalletError> {
        let body = key.trim();
        let body = body.strip_prefix("0x").unwrap_or(body);
        let bytes = Zeroizing::new(
            hex::decode(body).map_err(|_| WalletError::InvalidKey("not hex".into()))?,
        );
        let array: Zeroizing<[u8; 32]> = Zeroizing::new(
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| WalletError::InvalidKey("expected 32 bytes".into()))?,
        );
        Self::from_bytes(&array)
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let address = address_of(signing_key.verifying_key());
        Self {
            signing_key,
            address,
        }
    }

    /// Sign a 32-byte digest.
    pub fn sign_prehash(&self, prehash: &[u8; 32]) -> Result<Signature, WalletError> {
        let (sig, recid) = self
            .signing_key
            .sign_prehash_recoverable(prehash)
            .map_err(|e| WalletError::Backend(format!("signing failed: {e}")))?;
        let bytes = sig.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        Ok(Signature {
            r,
            s,
            v: 27 + recid.to_byte(),
        })
    }
}

impl fmt::Debug for LocalWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalWallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Signer for LocalWallet {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature, WalletError> {
        debug!(signer = %self.address, len = message.len(), "Signing personal message");
        self.sign_prehash(&hash_message(message))
    }

    async fn sign_transaction(&self, tx: &TransactionRequest) -> Result<Vec<u8>, WalletError> {
        debug!(
            signer = %self.address,
            nonce = tx.nonce,
            chain_id = tx.chain_id,
            "Signing transaction"
        );
        let signature = self.sign_prehash(&tx.signing_hash())?;
        Ok(tx.encode_signed(&signature))
    }
}
