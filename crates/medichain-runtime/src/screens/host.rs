//! # Screen Host
//!
//! Keeps one screen in step with the wallet session.
//!
//! | Event                       | Action                                |
//! |-----------------------------|---------------------------------------|
//! | `Connected`, `AccountChanged` | refresh                             |
//! | `Disconnected`, `ChainChanged` | reset                              |
//! | `ReloadRequested`           | reset, then complete the reload       |
//!
//! Only the first host to see a reload reconnects; the `Connected` it
//! publishes refreshes every host once.

use super::state::{ScreenError, ScreenState};
use super::Screen;
use mc_01_wallet::WalletStore;
use shared_bus::{EventFilter, SessionEvent, Subscription, SubscriptionError};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub struct ScreenHost<S: Screen> {
    screen: Arc<S>,
    wallet: Arc<WalletStore>,
    events: Subscription,
}

impl<S: Screen + 'static> ScreenHost<S> {
    /// Subscribe to the wallet's bus on behalf of `screen`.
    pub fn new(screen: Arc<S>, wallet: Arc<WalletStore>) -> Self {
        let events = wallet.subscribe(EventFilter::all());
        Self {
            screen,
            wallet,
            events,
        }
    }

    #[must_use]
    pub fn screen(&self) -> &Arc<S> {
        &self.screen
    }

    /// First load: fetch whatever the current session allows.
    pub async fn mount(&self) -> Result<ScreenState, ScreenError> {
        debug!(screen = self.screen.name(), "Mounting");
        self.screen.refresh().await
    }

    /// Apply one session event to the screen.
    pub async fn handle(&self, event: &SessionEvent) -> Result<ScreenState, ScreenError> {
        let name = self.screen.name();
        match event {
            SessionEvent::Connected { .. } | SessionEvent::AccountChanged { .. } => {
                debug!(screen = name, ?event, "Refreshing");
                self.screen.refresh().await
            }
            SessionEvent::Disconnected | SessionEvent::ChainChanged { .. } => {
                self.screen.reset();
                Ok(self.screen.state())
            }
            SessionEvent::ReloadRequested { chain_id } => {
                info!(screen = name, chain_id, "Reloading");
                self.screen.reset();
                if !self.wallet.complete_reload().await {
                    debug!(screen = name, "Reload handled elsewhere or no session");
                }
                Ok(self.screen.state())
            }
        }
    }

    /// Handle every event already queued. Returns how many were handled.
    pub async fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        loop {
            match self.events.try_recv() {
                Ok(Some(event)) => {
                    self.apply(&event).await;
                    handled += 1;
                }
                Ok(None) | Err(SubscriptionError::Closed) => return handled,
            }
        }
    }

    /// Handle events until the bus closes or `shutdown` flips.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let name = self.screen.name();
        if let Err(e) = self.mount().await {
            warn!(screen = name, error = %e.message(), "Initial load failed");
        }
        loop {
            tokio::select! {
                event = self.events.recv() => match event {
                    Some(event) => self.apply(&event).await,
                    None => {
                        info!(screen = name, "Session bus closed");
                        return;
                    }
                },
                _ = shutdown.changed() => {
                    info!(screen = name, "Shutdown signal received");
                    return;
                }
            }
        }
    }

    /// Run on a background task.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    async fn apply(&self, event: &SessionEvent) {
        if let Err(e) = self.handle(event).await {
            warn!(screen = self.screen.name(), error = %e.message(), "Screen update failed");
        }
    }
}
