//! # Wallet Store Service
//!
//! The explicit session context. Screens receive a shared [`WalletStore`]
//! instead of reading ambient state, and learn about changes through a
//! [`Subscription`] on the session bus.
//!
//! ## Lifecycle
//!
//! ```text
//!   disconnected ──connect()──► connecting ──► connected
//!        ▲                                        │
//!        │  AccountsChanged([]) / Disconnect      │ AccountsChanged([a, ..])
//!        └────────────────────────────────────────┤  (session replaced)
//!        │                                        │
//!        └──── ChainChanged(id) ◄─────────────────┘
//!              session cleared + ReloadRequested
//! ```
//!
//! A chain change always clears the session and requests a reload, whichever
//! chain was selected. The "was connected" flag survives it so the reload can
//! reconnect silently. However many listeners see `ReloadRequested`, only the
//! first [`WalletStore::complete_reload`] reconnects.

use crate::domain::errors::WalletError;
use crate::domain::networks::{find_network, network_name};
use crate::domain::session::{ProviderEvent, WalletSession, CONNECTED_FLAG_KEY};
use crate::ports::outbound::WalletBackend;
use parking_lot::RwLock;
use shared_bus::{EventFilter, EventPublisher, InMemoryEventBus, SessionEvent, Subscription};
use shared_types::{Address, LocalStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Holds the active wallet session and publishes its changes.
pub struct WalletStore {
    backend: Arc<dyn WalletBackend>,
    store: Arc<dyn LocalStore>,
    bus: Arc<InMemoryEventBus>,
    session: RwLock<Option<WalletSession>>,
    connecting: AtomicBool,
    reload_pending: AtomicBool,
}

impl WalletStore {
    /// Create a store with no active session.
    pub fn new(
        backend: Arc<dyn WalletBackend>,
        store: Arc<dyn LocalStore>,
        bus: Arc<InMemoryEventBus>,
    ) -> Self {
        Self {
            backend,
            store,
            bus,
            session: RwLock::new(None),
            connecting: AtomicBool::new(false),
            reload_pending: AtomicBool::new(false),
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Snapshot of the active session.
    #[must_use]
    pub fn session(&self) -> Option<WalletSession> {
        self.session.read().clone()
    }

    /// The active session, or `WalletNotConnected`.
    pub fn require_session(&self) -> Result<WalletSession, WalletError> {
        self.session().ok_or(WalletError::WalletNotConnected)
    }

    /// Whether a session is active.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.session.read().is_some()
    }

    /// Whether a connect request is in flight.
    #[must_use]
    pub fn is_connecting(&self) -> bool {
        self.connecting.load(Ordering::SeqCst)
    }

    /// Active account.
    #[must_use]
    pub fn address(&self) -> Option<Address> {
        self.session.read().as_ref().map(|s| s.address)
    }

    /// Chain of the active session.
    #[must_use]
    pub fn chain_id(&self) -> Option<u64> {
        self.session.read().as_ref().map(|s| s.chain_id)
    }

    /// Whether the session is on `target`.
    #[must_use]
    pub fn is_correct_network(&self, target: u64) -> bool {
        self.chain_id() == Some(target)
    }

    /// Display name of the session's chain.
    #[must_use]
    pub fn network_name(&self) -> &'static str {
        self.chain_id().map_or("Not Connected", network_name)
    }

    /// Fail with `NetworkMismatch` unless the session is on `target`.
    pub fn require_network(&self, target: u64) -> Result<WalletSession, WalletError> {
        let session = self.require_session()?;
        if session.is_on(target) {
            Ok(session)
        } else {
            Err(WalletError::NetworkMismatch {
                expected: target,
                actual: session.chain_id,
            })
        }
    }

    /// Subscribe to session changes.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        self.bus.subscribe(filter)
    }

    /// The bus this store publishes on.
    #[must_use]
    pub fn bus(&self) -> Arc<InMemoryEventBus> {
        Arc::clone(&self.bus)
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    /// Prompt the wallet for accounts and open a session on the first one.
    #[instrument(skip(self))]
    pub async fn connect(&self) -> Result<WalletSession, WalletError> {
        self.connecting.store(true, Ordering::SeqCst);
        let result = self.open_session(true).await;
        self.connecting.store(false, Ordering::SeqCst);

        let session = result?;
        self.store.set(CONNECTED_FLAG_KEY, "true")?;
        self.commit(&session);
        info!(address = %session.address, chain_id = session.chain_id, "Wallet connected");
        self.bus
            .publish(SessionEvent::Connected {
                address: session.address,
                chain_id: session.chain_id,
            })
            .await;
        Ok(session)
    }

    /// Reconnect without prompting if the user connected previously and the
    /// wallet still exposes an account. Returns whether a session was opened.
    #[instrument(skip(self))]
    pub async fn auto_connect(&self) -> bool {
        match self.store.get(CONNECTED_FLAG_KEY) {
            Ok(Some(flag)) if flag == "true" => {}
            Ok(_) => return false,
            Err(e) => {
                warn!(error = %e, "Could not read connection flag");
                return false;
            }
        }

        match self.open_session(false).await {
            Ok(session) => {
                self.commit(&session);
                info!(address = %session.address, "Wallet reconnected");
                self.bus
                    .publish(SessionEvent::Connected {
                        address: session.address,
                        chain_id: session.chain_id,
                    })
                    .await;
                true
            }
            Err(WalletError::NoAccounts) => {
                debug!("Auto-connect skipped: wallet exposes no accounts");
                false
            }
            Err(e) => {
                warn!(error = %e, "Auto-connect failed");
                false
            }
        }
    }

    /// Finish a reload requested by a chain change: reconnect silently, once.
    /// Returns whether this call opened the session.
    #[instrument(skip(self))]
    pub async fn complete_reload(&self) -> bool {
        if !self.reload_pending.swap(false, Ordering::SeqCst) {
            debug!("No reload pending");
            return false;
        }
        self.auto_connect().await
    }

    /// Drop the session and forget that the user connected.
    ///
    /// `Disconnected` is published even if the flag cannot be removed.
    #[instrument(skip(self))]
    pub async fn disconnect(&self) -> Result<(), WalletError> {
        self.session.write().take();
        self.reload_pending.store(false, Ordering::SeqCst);
        if let Err(e) = self.store.remove(CONNECTED_FLAG_KEY) {
            warn!(error = %e, "Could not clear connection flag");
        }
        info!("Wallet disconnected");
        self.bus.publish(SessionEvent::Disconnected).await;
        Ok(())
    }

    /// Ask the wallet to move to `chain_id`, then run the chain-change path.
    #[instrument(skip(self))]
    pub async fn switch_network(&self, chain_id: u64) -> Result<(), WalletError> {
        self.require_session()?;
        if find_network(chain_id).is_none() {
            return Err(WalletError::UnknownNetwork(chain_id));
        }
        self.backend.switch_chain(chain_id).await?;
        self.chain_changed(chain_id).await;
        Ok(())
    }

    /// React to a notification raised by the wallet.
    #[instrument(skip(self))]
    pub async fn handle_provider_event(&self, event: ProviderEvent) -> Result<(), WalletError> {
        match event {
            ProviderEvent::AccountsChanged(accounts) => match accounts.first() {
                None => self.disconnect().await,
                Some(&address) => self.account_changed(address).await,
            },
            ProviderEvent::ChainChanged(chain_id) => {
                self.chain_changed(chain_id).await;
                Ok(())
            }
            ProviderEvent::Disconnect => self.disconnect().await,
        }
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    async fn open_session(&self, prompt: bool) -> Result<WalletSession, WalletError> {
        let accounts = if prompt {
            self.backend.request_accounts().await?
        } else {
            self.backend.accounts().await?
        };
        let address = *accounts.first().ok_or(WalletError::NoAccounts)?;
        let signer = self.backend.signer(address)?;
        let chain_id = self.backend.chain_id().await?;

        Ok(WalletSession {
            address,
            chain_id,
            signer,
        })
    }

    fn commit(&self, session: &WalletSession) {
        self.reload_pending.store(false, Ordering::SeqCst);
        *self.session.write() = Some(session.clone());
    }

    async fn account_changed(&self, address: Address) -> Result<(), WalletError> {
        if self.address() == Some(address) {
            return Ok(());
        }
        let signer = self.backend.signer(address)?;
        let chain_id = match self.chain_id() {
            Some(id) => id,
            None => self.backend.chain_id().await?,
        };
        *self.session.write() = Some(WalletSession {
            address,
            chain_id,
            signer,
        });
        info!(address = %address, "Active account changed");
        self.bus.publish(SessionEvent::AccountChanged { address }).await;
        Ok(())
    }

    async fn chain_changed(&self, chain_id: u64) {
        self.session.write().take();
        self.reload_pending.store(true, Ordering::SeqCst);
        info!(chain_id, network = network_name(chain_id), "Chain changed, reloading");
        self.bus.publish(SessionEvent::ChainChanged { chain_id }).await;
        self.bus
            .publish(SessionEvent::ReloadRequested { chain_id })
            .await;
    }
}
