//! # Recoverable Signatures
//!
//! 65-byte secp256k1 signatures in wallet format (`r ‖ s ‖ v`, `v ∈ {27, 28}`)
//! and the EIP-191 personal-message hash they are produced over.
//!
//! The hex form of a message signature is also raw key material for the
//! encryption pipeline, so [`Signature::to_hex`] must be stable: lowercase,
//! `0x`-prefixed, 132 characters.

use super::errors::WalletError;
use k256::ecdsa::{RecoveryId, Signature as K256Signature, VerifyingKey};
use sha3::{Digest, Keccak256};
use shared_types::Address;
use std::fmt;

/// A recoverable ECDSA signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// R component.
    pub r: [u8; 32],
    /// S component (always low-S).
    pub s: [u8; 32],
    /// Recovery byte, 27 or 28.
    pub v: u8,
}

impl Signature {
    /// Serialize as `r ‖ s ‖ v`.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }

    /// Parse from `r ‖ s ‖ v`. Accepts `v` as 0/1 or 27/28.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WalletError> {
        if bytes.len() != 65 {
            return Err(WalletError::InvalidSignature(format!(
                "expected 65 bytes, got {}",
                bytes.len()
            )));
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        let v = match bytes[64] {
            0 | 27 => 27,
            1 | 28 => 28,
            other => {
                return Err(WalletError::InvalidSignature(format!(
                    "invalid recovery byte {other}"
                )))
            }
        };
        Ok(Self { r, s, v })
    }

    /// Parse from a `0x`-prefixed hex string.
    pub fn from_hex(s: &str) -> Result<Self, WalletError> {
        let body = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(body).map_err(|e| WalletError::InvalidSignature(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Wallet-style hex string, e.g. `0x1b2c…1c`.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    /// Recovery id (0 or 1).
    #[must_use]
    pub fn recovery_id(&self) -> u8 {
        self.v - 27
    }

    /// Recover the address that signed `prehash`.
    pub fn recover_prehash(&self, prehash: &[u8; 32]) -> Result<Address, WalletError> {
        let mut rs = [0u8; 64];
        rs[..32].copy_from_slice(&self.r);
        rs[32..].copy_from_slice(&self.s);
        let sig = K256Signature::from_slice(&rs)
            .map_err(|e| WalletError::InvalidSignature(e.to_string()))?;
        let recid = RecoveryId::try_from(self.recovery_id())
            .map_err(|e| WalletError::InvalidSignature(e.to_string()))?;
        let key = VerifyingKey::recover_from_prehash(prehash, &sig, recid)
            .map_err(|e| WalletError::InvalidSignature(e.to_string()))?;
        Ok(address_of(&key))
    }

    /// Recover the address that signed a personal message.
    pub fn recover(&self, message: &[u8]) -> Result<Address, WalletError> {
        self.recover_prehash(&hash_message(message))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// EIP-191 hash: `keccak256("\x19Ethereum Signed Message:\n" ‖ len ‖ message)`.
#[must_use]
pub fn hash_message(message: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(b"\x19Ethereum Signed Message:\n");
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message);
    hasher.finalize().into()
}

/// Address owning a verifying key.
#[must_use]
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let mut uncompressed = [0u8; 64];
    uncompressed.copy_from_slice(&point.as_bytes()[1..]);
    Address::from_public_key(&uncompressed)
}
