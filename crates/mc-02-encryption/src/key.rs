//! # Signature-Derived Keys
//!
//! The wallet signs a fixed, human-readable message and the signature's hex
//! string becomes the raw key material. Because wallet signatures are
//! deterministic (RFC 6979), the same account always re-derives the same key
//! without anything being stored.
//!
//! The shared-access variant signs a grantee-specific message and hashes the
//! signature together with the grantee's address.

use crate::errors::EncryptionError;
use mc_01_wallet::Signer;
use sha2::{Digest, Sha256};
use shared_types::Address;
use std::fmt;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Message signed to derive a record-encryption key.
pub const KEY_DERIVATION_MESSAGE: &str = "Sign this message to encrypt/decrypt your medical records";

/// Raw key material (a signature or shared-key hex string).
///
/// Zeroized on drop. `Debug` never prints the contents.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct RawKey(String);

impl RawKey {
    /// Wrap an existing secret string.
    #[must_use]
    pub fn from_secret(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Bytes fed to the password-based derivation.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// The secret string itself.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RawKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawKey(<redacted>)")
    }
}

/// Derive the record key by signing `message` (usually
/// [`KEY_DERIVATION_MESSAGE`]).
pub async fn derive_key(signer: &dyn Signer, message: &str) -> Result<RawKey, EncryptionError> {
    debug!(signer = %signer.address(), "Deriving encryption key from signature");
    let signature = signer.sign_message(message.as_bytes()).await?;
    Ok(RawKey(signature.to_hex()))
}

/// Message signed when sharing records with `grantee`.
#[must_use]
pub fn share_message(grantee: &Address) -> String {
    format!("Share medical records with {grantee}")
}

/// Derive a key tied to `grantee`: `hex(sha256(signature_hex ‖ grantee))`.
pub async fn derive_shared_key(
    signer: &dyn Signer,
    grantee: &Address,
) -> Result<RawKey, EncryptionError> {
    debug!(signer = %signer.address(), grantee = %grantee, "Deriving shared key");
    let signature = signer.sign_message(share_message(grantee).as_bytes()).await?;
    let mut hasher = Sha256::new();
    hasher.update(signature.to_hex().as_bytes());
    hasher.update(grantee.to_string().as_bytes());
    Ok(RawKey(hex::encode(hasher.finalize())))
}
