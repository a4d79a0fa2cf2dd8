//! # Feature Screens
//!
//! One dashboard per role. Each owns its local view state, re-fetches
//! everything from the chain on every refresh, and reports failures as a
//! [`ScreenError`] whose [`message`](ScreenError::message) is the toast text.
//!
//! | Screen                 | Registered when                      |
//! |------------------------|--------------------------------------|
//! | [`PatientDashboard`]   | the account holds a patient NFT      |
//! | [`DoctorDashboard`]    | the account is a verified doctor     |
//! | [`PharmacyDashboard`]  | the account is a verified pharmacy   |
//! | [`AdminDashboard`]     | always, once connected               |
//!
//! [`ScreenHost`] drives any of them from session events.

pub mod admin;
pub mod doctor;
pub mod file;
pub mod host;
pub mod patient;
pub mod pharmacy;
pub mod state;

pub use admin::{AdminDashboard, DoctorForm, PharmacyForm, PlatformStats};
pub use doctor::{DoctorDashboard, IssuedPrescription, PrescriptionForm, PrescriptionMetadata};
pub use file::{content_type_for, RecordFile, ALLOWED_RECORD_TYPES, MAX_RECORD_SIZE};
pub use host::ScreenHost;
pub use patient::{PatientDashboard, UploadedRecord};
pub use pharmacy::{PharmacyDashboard, PrescriptionCheck};
pub use state::{NoProgress, ProgressObserver, ScreenError, ScreenState, UploadStage};

use async_trait::async_trait;
use mc_01_wallet::WalletStore;

/// What a [`ScreenHost`] needs from a dashboard.
#[async_trait]
pub trait Screen: Send + Sync {
    /// Display name, for logs.
    fn name(&self) -> &'static str;

    /// Current lifecycle state.
    fn state(&self) -> ScreenState;

    /// Re-fetch everything for the current session.
    async fn refresh(&self) -> Result<ScreenState, ScreenError>;

    /// Drop all view state.
    fn reset(&self);
}

/// State of a screen that has no session-specific data yet.
pub(crate) fn session_state(wallet: &WalletStore) -> Option<ScreenState> {
    if wallet.is_connected() {
        None
    } else if wallet.is_connecting() {
        Some(ScreenState::Connecting)
    } else {
        Some(ScreenState::Disconnected)
    }
}

/// Current unix time in seconds.
pub(crate) fn now_secs() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default()
}
