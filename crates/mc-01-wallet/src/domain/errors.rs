//! # Wallet Errors
//!
//! Error types for session and signing operations.

use shared_types::{Address, StoreError};
use thiserror::Error;

/// Errors that can occur while connecting a wallet or signing with it.
#[derive(Debug, Error)]
pub enum WalletError {
    /// The user declined a signature or connection prompt.
    #[error("Signature rejected by user")]
    UserRejected,

    /// An operation needed a session but none is active.
    #[error("Wallet not connected")]
    WalletNotConnected,

    /// The wallet exposed no accounts.
    #[error("No accounts found")]
    NoAccounts,

    /// The requested account is not managed by this wallet.
    #[error("Unknown account: {0}")]
    UnknownAccount(Address),

    /// The wallet does not know the requested chain.
    #[error("Please add this network to your wallet (chain {0})")]
    UnknownNetwork(u64),

    /// The session is on a different chain than the caller requires.
    #[error("Wrong network: expected chain {expected}, connected to {actual}")]
    NetworkMismatch {
        /// Chain the caller requires.
        expected: u64,
        /// Chain the wallet is on.
        actual: u64,
    },

    /// Private key material could not be parsed.
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    /// A signature was malformed or did not recover.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Amount string could not be parsed.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// The wallet backend failed for another reason.
    #[error("Wallet error: {0}")]
    Backend(String),

    /// Persisting the connection flag failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
