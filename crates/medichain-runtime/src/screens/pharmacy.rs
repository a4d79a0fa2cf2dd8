//! # Pharmacy Dashboard
//!
//! Scan a prescription QR, check it against the contract, dispense.

use super::state::{ScreenError, ScreenState};
use super::{now_secs, session_state, Screen};
use crate::container::AppContainer;
use crate::qr::PrescriptionCode;
use async_trait::async_trait;
use mc_04_contracts::{Pharmacy, Prescription, PrescriptionStatus, TransactionReceipt, Verification};
use parking_lot::RwLock;
use serde::Serialize;
use shared_types::U256;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Everything shown after a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrescriptionCheck {
    pub prescription: Prescription,
    pub verification: Verification,
    pub expired: bool,
    pub dispensed: bool,
}

impl PrescriptionCheck {
    /// Whether the dispense button should be enabled.
    #[must_use]
    pub fn can_dispense(&self) -> bool {
        self.verification.is_valid && !self.expired && !self.dispensed
    }
}

#[derive(Debug, Clone)]
struct PharmacyView {
    state: ScreenState,
    verified: bool,
    profile: Option<Pharmacy>,
    last_check: Option<PrescriptionCheck>,
}

impl Default for PharmacyView {
    fn default() -> Self {
        Self {
            state: ScreenState::Disconnected,
            verified: false,
            profile: None,
            last_check: None,
        }
    }
}

pub struct PharmacyDashboard {
    app: Arc<AppContainer>,
    view: RwLock<PharmacyView>,
}

impl PharmacyDashboard {
    pub fn new(app: Arc<AppContainer>) -> Self {
        Self {
            app,
            view: RwLock::new(PharmacyView::default()),
        }
    }

    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.view.read().verified
    }

    #[must_use]
    pub fn profile(&self) -> Option<Pharmacy> {
        self.view.read().profile.clone()
    }

    /// Result of the most recent [`verify`](Self::verify).
    #[must_use]
    pub fn last_check(&self) -> Option<PrescriptionCheck> {
        self.view.read().last_check.clone()
    }

    /// Prescription id from a scanned QR payload.
    pub fn scan(&self, text: &str) -> Result<U256, ScreenError> {
        PrescriptionCode::scan(text)
    }

    /// Load a prescription and the contract's verdict on it.
    #[instrument(skip(self))]
    pub async fn verify(&self, id: U256) -> Result<PrescriptionCheck, ScreenError> {
        let contract = self.app.prescriptions()?;
        let verification = contract.verify(id).await?;
        let prescription = contract.get(id).await?;
        let check = PrescriptionCheck {
            expired: prescription.is_expired_at(now_secs()),
            dispensed: prescription.status == PrescriptionStatus::Dispensed,
            prescription,
            verification,
        };
        self.view.write().last_check = Some(check.clone());
        Ok(check)
    }

    /// Dispense after the pharmacist confirmed.
    ///
    /// The prescription is re-verified first; an invalid one is refused with
    /// the contract's message and nothing is sent.
    #[instrument(skip(self))]
    pub async fn dispense(
        &self,
        id: U256,
        confirmed: bool,
    ) -> Result<TransactionReceipt, ScreenError> {
        if !confirmed {
            return Err(ScreenError::ConfirmationRequired);
        }
        self.app.wallet().require_session()?;
        let check = self.verify(id).await?;
        if !check.verification.is_valid {
            warn!(
                prescription_id = %id,
                reason = %check.verification.message,
                "Refusing to dispense"
            );
            return Err(ScreenError::Validation(check.verification.message));
        }
        let receipt = self.app.prescriptions()?.dispense(id).await?;
        info!(prescription_id = %id, tx = %receipt.transaction_hash, "Medicine dispensed");
        self.view.write().last_check = None;
        Ok(receipt)
    }
}

#[async_trait]
impl Screen for PharmacyDashboard {
    fn name(&self) -> &'static str {
        "pharmacy"
    }

    fn state(&self) -> ScreenState {
        self.view.read().state
    }

    async fn refresh(&self) -> Result<ScreenState, ScreenError> {
        let wallet = self.app.wallet();
        if let Some(state) = session_state(&wallet) {
            *self.view.write() = PharmacyView {
                state,
                ..PharmacyView::default()
            };
            return Ok(state);
        }
        let me = wallet.require_session()?.address;

        let registry = self.app.pharmacy_registry()?;
        let verified = registry.is_verified(me).await?;
        let profile = if verified {
            Some(registry.get(me).await?)
        } else {
            None
        };

        let state = ScreenState::connected(verified);
        *self.view.write() = PharmacyView {
            state,
            verified,
            profile,
            last_check: None,
        };
        Ok(state)
    }

    fn reset(&self) {
        *self.view.write() = PharmacyView::default();
    }
}
