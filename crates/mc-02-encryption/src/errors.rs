//! Encryption error types.

use mc_01_wallet::WalletError;
use shared_types::StoreError;
use thiserror::Error;

/// Errors from key derivation, encryption and decryption.
#[derive(Debug, Error)]
pub enum EncryptionError {
    /// The user declined the key-derivation signature.
    #[error("User rejected signature request")]
    UserRejected,

    /// No wallet session to derive a key from.
    #[error("Wallet not connected")]
    WalletNotConnected,

    /// Decryption failed. Deliberately carries no detail: wrong key, tampered
    /// envelope and bad padding are indistinguishable to the caller.
    #[error("Decryption failed")]
    DecryptionFailed,

    /// The envelope could not be parsed.
    #[error("Invalid encrypted payload: {0}")]
    InvalidPayload(String),

    /// The wallet failed to sign for another reason.
    #[error("Failed to generate encryption key: {0}")]
    Signing(String),

    /// Metadata persistence failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<WalletError> for EncryptionError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::UserRejected => Self::UserRejected,
            WalletError::WalletNotConnected => Self::WalletNotConnected,
            other => Self::Signing(other.to_string()),
        }
    }
}
