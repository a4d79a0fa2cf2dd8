//! # Outbound Ports (Driven Ports / SPI)
//!
//! The two capabilities a browser wallet exposes: producing signatures for
//! one account, and managing which accounts and chain are active.

use crate::domain::errors::WalletError;
use crate::domain::signature::Signature;
use crate::domain::transaction::TransactionRequest;
use async_trait::async_trait;
use shared_types::Address;
use std::sync::Arc;

/// Signing capability bound to one account.
///
/// Every call may prompt the user; a declined prompt is
/// [`WalletError::UserRejected`].
#[async_trait]
pub trait Signer: Send + Sync {
    /// The account this signer signs for.
    fn address(&self) -> Address;

    /// Sign a personal message (EIP-191).
    async fn sign_message(&self, message: &[u8]) -> Result<Signature, WalletError>;

    /// Sign a transaction and return the raw RLP bytes ready for broadcast.
    async fn sign_transaction(&self, tx: &TransactionRequest) -> Result<Vec<u8>, WalletError>;
}

/// Account and chain management offered by the wallet.
#[async_trait]
pub trait WalletBackend: Send + Sync {
    /// Ask the user to expose accounts (may prompt).
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// Accounts already exposed to this application (never prompts).
    async fn accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// Chain the wallet is currently on.
    async fn chain_id(&self) -> Result<u64, WalletError>;

    /// Signing capability for an exposed account.
    fn signer(&self, address: Address) -> Result<Arc<dyn Signer>, WalletError>;

    /// Ask the wallet to move to another chain.
    ///
    /// # Errors
    /// * `WalletError::UnknownNetwork` - the wallet has no entry for `chain_id`
    /// * `WalletError::UserRejected` - the user declined the switch
    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError>;
}
