//! # Wallet Session
//!
//! A [`WalletSession`] exists only while a wallet is connected. Any account
//! or chain change replaces it; nothing about it is persisted except the
//! "was connected" flag kept by the store.

use crate::ports::outbound::Signer;
use shared_types::Address;
use std::fmt;
use std::sync::Arc;

/// Storage key of the "was connected" flag.
pub const CONNECTED_FLAG_KEY: &str = "walletConnected";

/// The connected account, its chain, and the capability to sign as it.
#[derive(Clone)]
pub struct WalletSession {
    /// Active account.
    pub address: Address,
    /// Chain the wallet reported.
    pub chain_id: u64,
    /// Signing capability for `address`.
    pub signer: Arc<dyn Signer>,
}

impl WalletSession {
    /// Whether the session is on `chain_id`.
    #[must_use]
    pub fn is_on(&self, chain_id: u64) -> bool {
        self.chain_id == chain_id
    }
}

impl fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletSession")
            .field("address", &self.address)
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

/// Notifications raised by the wallet itself, outside any request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// The exposed account list changed; empty means locked or revoked.
    AccountsChanged(Vec<Address>),
    /// The wallet switched chains.
    ChainChanged(u64),
    /// The wallet disconnected from the page.
    Disconnect,
}
