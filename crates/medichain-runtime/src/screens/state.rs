//! # Screen State
//!
//! The session states every dashboard moves through, the upload progress
//! stages, and the single error type screens show as a toast.

use mc_01_wallet::WalletError;
use mc_02_encryption::EncryptionError;
use mc_03_ipfs::IpfsError;
use mc_04_contracts::{format_error, ContractError};
use serde::Serialize;
use shared_types::{StoreError, TypeError};
use thiserror::Error;

// =============================================================================
// SESSION STATE
// =============================================================================

/// Where a dashboard is in its session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScreenState {
    /// No wallet session.
    Disconnected,
    /// A connect request is in flight.
    Connecting,
    /// Connected, but the account has no role on chain yet.
    ConnectedUnregistered,
    /// Connected with a role (patient NFT, verified doctor or pharmacy).
    ConnectedRegistered,
}

impl ScreenState {
    /// Connected, registered or not.
    #[must_use]
    pub fn is_connected(self) -> bool {
        matches!(
            self,
            Self::ConnectedUnregistered | Self::ConnectedRegistered
        )
    }

    /// State after a refresh that found (or did not find) a role.
    #[must_use]
    pub fn connected(registered: bool) -> Self {
        if registered {
            Self::ConnectedRegistered
        } else {
            Self::ConnectedUnregistered
        }
    }
}

// =============================================================================
// UPLOAD PROGRESS
// =============================================================================

/// Stages of the record upload pipeline, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum UploadStage {
    Encrypting,
    Uploading,
    RecordingOnChain,
    Done,
}

impl UploadStage {
    /// Progress bar value for this stage.
    #[must_use]
    pub const fn percent(self) -> u8 {
        match self {
            Self::Encrypting => 20,
            Self::Uploading => 50,
            Self::RecordingOnChain => 75,
            Self::Done => 100,
        }
    }

    /// Toast shown when the stage starts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Encrypting => "Encrypting file...",
            Self::Uploading => "Uploading to IPFS...",
            Self::RecordingOnChain => "Adding to blockchain...",
            Self::Done => "Medical record uploaded successfully!",
        }
    }
}

/// Receives upload progress.
pub trait ProgressObserver: Send + Sync {
    fn on_stage(&self, stage: UploadStage);
}

/// Observer that drops every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_stage(&self, _stage: UploadStage) {}
}

impl<F> ProgressObserver for F
where
    F: Fn(UploadStage) + Send + Sync,
{
    fn on_stage(&self, stage: UploadStage) {
        self(stage);
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Everything a screen operation can fail with.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error(transparent)]
    Encryption(#[from] EncryptionError),

    #[error(transparent)]
    Ipfs(#[from] IpfsError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// User input was rejected before anything was sent.
    #[error("{0}")]
    Validation(String),

    /// The account has no patient NFT.
    #[error("No patient NFT found for this account")]
    NotRegistered,

    /// The account lacks the access level an operation needs.
    #[error("You do not have access to this patient's records")]
    AccessDenied,

    /// A destructive action was requested without confirming it.
    #[error("Please confirm before dispensing")]
    ConfirmationRequired,

    /// A scanned code is not a MediChain payload.
    #[error("Invalid QR code: {0}")]
    InvalidQr(String),
}

impl From<TypeError> for ScreenError {
    fn from(e: TypeError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl ScreenError {
    /// One-line toast text.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Contract(e) => format_error(e),
            other => other.to_string(),
        }
    }

    /// True when the user declined a prompt, which screens do not report as a failure.
    #[must_use]
    pub fn is_user_rejection(&self) -> bool {
        matches!(
            self,
            Self::Wallet(WalletError::UserRejected)
                | Self::Contract(ContractError::UserRejected)
                | Self::Encryption(EncryptionError::UserRejected)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_stage_percentages_increase() {
        let stages = [
            UploadStage::Encrypting,
            UploadStage::Uploading,
            UploadStage::RecordingOnChain,
            UploadStage::Done,
        ];
        let percents: Vec<u8> = stages.iter().map(|s| s.percent()).collect();
        assert_eq!(percents, vec![20, 50, 75, 100]);
        assert!(stages.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_closure_observer() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let observer = move |stage: UploadStage| sink.lock().push(stage);
        observer.on_stage(UploadStage::Uploading);
        NoProgress.on_stage(UploadStage::Done);
        assert_eq!(*seen.lock(), vec![UploadStage::Uploading]);
    }

    #[test]
    fn test_connected_state() {
        assert_eq!(ScreenState::connected(true), ScreenState::ConnectedRegistered);
        assert!(ScreenState::connected(false).is_connected());
        assert!(!ScreenState::Connecting.is_connected());
    }

    #[test]
    fn test_contract_messages_use_reason() {
        let err = ScreenError::from(ContractError::Reverted("Not authorized".into()));
        assert_eq!(err.message(), "Not authorized");
        assert!(!err.is_user_rejection());
    }

    #[test]
    fn test_rejections_detected() {
        assert!(ScreenError::from(EncryptionError::UserRejected).is_user_rejection());
        assert!(ScreenError::from(ContractError::UserRejected).is_user_rejection());
        assert_eq!(
            ScreenError::from(ContractError::UserRejected).message(),
            "Transaction rejected by user"
        );
    }
}
