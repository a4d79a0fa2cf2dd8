//! # Local Keyring
//!
//! A [`WalletBackend`] over in-process keys. Accounts stay hidden until
//! [`WalletBackend::request_accounts`] authorizes them, mirroring how a
//! browser wallet gates `eth_accounts` behind a connection prompt.

use crate::adapters::local_wallet::LocalWallet;
use crate::domain::errors::WalletError;
use crate::domain::networks::find_network;
use crate::ports::outbound::{Signer, WalletBackend};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::Address;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// In-process wallet holding one or more accounts.
pub struct LocalKeyring {
    wallets: RwLock<Vec<Arc<LocalWallet>>>,
    chain_id: AtomicU64,
    authorized: AtomicBool,
}

impl LocalKeyring {
    /// Create a keyring on `chain_id`. Accounts are not yet authorized.
    #[must_use]
    pub fn new(wallets: Vec<LocalWallet>, chain_id: u64) -> Self {
        Self {
            wallets: RwLock::new(wallets.into_iter().map(Arc::new).collect()),
            chain_id: AtomicU64::new(chain_id),
            authorized: AtomicBool::new(false),
        }
    }

    /// Create a keyring whose accounts are already exposed.
    #[must_use]
    pub fn authorized(wallets: Vec<LocalWallet>, chain_id: u64) -> Self {
        let keyring = Self::new(wallets, chain_id);
        keyring.authorized.store(true, Ordering::SeqCst);
        keyring
    }

    /// Make `address` the first exposed account. Returns the new order.
    pub fn select_account(&self, address: Address) -> Result<Vec<Address>, WalletError> {
        let mut wallets = self.wallets.write();
        let index = wallets
            .iter()
            .position(|w| w.address() == address)
            .ok_or(WalletError::UnknownAccount(address))?;
        let wallet = wallets.remove(index);
        wallets.insert(0, wallet);
        Ok(wallets.iter().map(|w| w.address()).collect())
    }

    /// Revoke this application's access to the accounts.
    pub fn revoke(&self) {
        self.authorized.store(false, Ordering::SeqCst);
    }

    fn addresses(&self) -> Vec<Address> {
        self.wallets.read().iter().map(|w| w.address()).collect()
    }
}

#[async_trait]
impl WalletBackend for LocalKeyring {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.authorized.store(true, Ordering::SeqCst);
        Ok(self.addresses())
    }

    async fn accounts(&self) -> Result<Vec<Address>, WalletError> {
        if self.authorized.load(Ordering::SeqCst) {
            Ok(self.addresses())
        } else {
            Ok(Vec::new())
        }
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        Ok(self.chain_id.load(Ordering::SeqCst))
    }

    fn signer(&self, address: Address) -> Result<Arc<dyn Signer>, WalletError> {
        if !self.authorized.load(Ordering::SeqCst) {
            return Err(WalletError::WalletNotConnected);
        }
        self.wallets
            .read()
            .iter()
            .find(|w| w.address() == address)
            .map(|w| Arc::clone(w) as Arc<dyn Signer>)
            .ok_or(WalletError::UnknownAccount(address))
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
        let Some(network) = find_network(chain_id) else {
            debug!(chain_id, "Switch requested to unknown chain");
            return Err(WalletError::UnknownNetwork(chain_id));
        };
        self.chain_id.store(chain_id, Ordering::SeqCst);
        info!(chain_id, network = network.name, "Keyring switched chain");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyring() -> LocalKeyring {
        LocalKeyring::new(
            vec![
                LocalWallet::from_bytes(&[1; 32]).unwrap(),
                LocalWallet::from_bytes(&[2; 32]).unwrap(),
            ],
            80001,
        )
    }

    #[tokio::test]
    async fn test_accounts_hidden_until_requested() {
        let keyring = keyring();
        assert!(keyring.accounts().await.unwrap().is_empty());
        let requested = keyring.request_accounts().await.unwrap();
        assert_eq!(requested.len(), 2);
        assert_eq!(keyring.accounts().await.unwrap(), requested);
    }

    #[tokio::test]
    async fn test_signer_requires_authorization() {
        let keyring = keyring();
        let first = keyring.addresses()[0];
        assert!(matches!(
            keyring.signer(first),
            Err(WalletError::WalletNotConnected)
        ));
        keyring.request_accounts().await.unwrap();
        assert_eq!(keyring.signer(first).unwrap().address(), first);
        assert!(matches!(
            keyring.signer(Address::ZERO),
            Err(WalletError::UnknownAccount(_))
        ));
    }

    #[tokio::test]
    async fn test_switch_chain() {
        let keyring = keyring();
        keyring.switch_chain(137).await.unwrap();
        assert_eq!(keyring.chain_id().await.unwrap(), 137);
        assert!(matches!(
            keyring.switch_chain(424242).await,
            Err(WalletError::UnknownNetwork(424242))
        ));
        assert_eq!(keyring.chain_id().await.unwrap(), 137);
    }

    #[tokio::test]
    async fn test_select_account_reorders() {
        let keyring = keyring();
        let second = keyring.addresses()[1];
        let order = keyring.select_account(second).unwrap();
        assert_eq!(order[0], second);
        assert!(keyring.select_account(Address::ZERO).is_err());
    }
}
