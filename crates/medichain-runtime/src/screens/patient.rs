//! # Patient Dashboard
//!
//! Health NFT, encrypted medical records, access grants and the health
//! passport QR.
//!
//! ## Record Upload
//!
//! ```text
//! validate ──► Encrypting (20%) ──► Uploading (50%) ──► RecordingOnChain (75%) ──► Done (100%)
//!              wallet signature      envelope to IPFS     addMedicalRecord(cid)
//! ```
//!
//! The pipeline is strictly sequential and stops at the first failure. The
//! envelope that is uploaded carries its IV, salt and tag, so the CID alone is
//! enough to decrypt with the patient's key.

use super::file::RecordFile;
use super::state::{ProgressObserver, ScreenError, ScreenState, UploadStage};
use super::{now_secs, session_state, Screen};
use crate::container::AppContainer;
use crate::qr::HealthPassport;
use async_trait::async_trait;
use mc_02_encryption::EncryptedPayload;
use mc_04_contracts::{AccessLevel, MedicalRecord, Prescription, TransactionReceipt};
use parking_lot::RwLock;
use serde::Serialize;
use shared_types::{Address, Cid, TxHash, U256};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Result of a completed upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedRecord {
    pub cid: Cid,
    pub url: String,
    pub tx_hash: TxHash,
    /// Position of the record on the token.
    pub index: usize,
}

#[derive(Debug, Clone)]
struct PatientView {
    state: ScreenState,
    token_id: Option<U256>,
    records: Vec<MedicalRecord>,
}

impl Default for PatientView {
    fn default() -> Self {
        Self {
            state: ScreenState::Disconnected,
            token_id: None,
            records: Vec::new(),
        }
    }
}

/// The patient's view of their own health NFT.
pub struct PatientDashboard {
    app: Arc<AppContainer>,
    view: RwLock<PatientView>,
}

impl PatientDashboard {
    pub fn new(app: Arc<AppContainer>) -> Self {
        Self {
            app,
            view: RwLock::new(PatientView::default()),
        }
    }

    // =========================================================================
    // VIEW
    // =========================================================================

    #[must_use]
    pub fn token_id(&self) -> Option<U256> {
        self.view.read().token_id
    }

    /// Every record pointer on the token, including deactivated ones.
    #[must_use]
    pub fn records(&self) -> Vec<MedicalRecord> {
        self.view.read().records.clone()
    }

    #[must_use]
    pub fn active_records(&self) -> Vec<MedicalRecord> {
        self.view
            .read()
            .records
            .iter()
            .filter(|r| r.is_active)
            .cloned()
            .collect()
    }

    fn require_token(&self) -> Result<U256, ScreenError> {
        self.token_id().ok_or(ScreenError::NotRegistered)
    }

    // =========================================================================
    // NFT
    // =========================================================================

    /// Mint a health NFT for the connected account.
    #[instrument(skip(self))]
    pub async fn register(&self) -> Result<U256, ScreenError> {
        let session = self.app.wallet().require_session()?;
        if let Some(existing) = self.token_id() {
            return Err(ScreenError::Validation(format!(
                "This account already holds patient NFT #{existing}"
            )));
        }
        let token_id = self.app.patient_nft()?.mint(session.address).await?;
        info!(%token_id, "Health NFT minted");
        self.refresh().await?;
        Ok(token_id)
    }

    /// Passport QR payload for the connected patient.
    pub fn health_passport(&self) -> Result<HealthPassport, ScreenError> {
        let address = self
            .app
            .wallet()
            .address()
            .ok_or(mc_01_wallet::WalletError::WalletNotConnected)?;
        let token_id = self.require_token()?;
        Ok(HealthPassport::new(
            token_id,
            address,
            chrono::Utc::now().timestamp_millis(),
        ))
    }

    // =========================================================================
    // RECORDS
    // =========================================================================

    /// Encrypt `file`, pin the envelope and record its CID on the token.
    #[instrument(skip(self, file, progress), fields(name = %file.name, len = file.data.len()))]
    pub async fn upload_record(
        &self,
        file: &RecordFile,
        progress: &dyn ProgressObserver,
    ) -> Result<UploadedRecord, ScreenError> {
        file.validate_record()?;
        let token_id = self.require_token()?;
        let encryptor = self.app.encryptor()?;
        let nft = self.app.patient_nft()?;

        progress.on_stage(UploadStage::Encrypting);
        let envelope = encryptor.encrypt_bytes(&file.data).await?;

        progress.on_stage(UploadStage::Uploading);
        let uploaded = self.app.ipfs().upload_encrypted(&envelope, &file.name).await?;

        progress.on_stage(UploadStage::RecordingOnChain);
        // The new record lands after whatever the chain holds now.
        let index = nft.medical_records(token_id).await?.len();
        let receipt = nft
            .add_medical_record(token_id, uploaded.cid.as_str())
            .await?;

        if let Err(e) = self
            .app
            .metadata()
            .save(&token_id.to_string(), index, &envelope)
        {
            warn!(error = %e, "Could not cache encryption metadata");
        }

        progress.on_stage(UploadStage::Done);
        info!(cid = %uploaded.cid, tx = %receipt.transaction_hash, "Medical record uploaded");

        if let Err(e) = self.refresh().await {
            warn!(error = %e, "Refresh after upload failed");
        }
        Ok(UploadedRecord {
            cid: uploaded.cid,
            url: uploaded.url,
            tx_hash: receipt.transaction_hash,
            index,
        })
    }

    /// Fetch and decrypt the record at `index`.
    #[instrument(skip(self))]
    pub async fn download_record(&self, index: usize) -> Result<Vec<u8>, ScreenError> {
        let record = self
            .view
            .read()
            .records
            .get(index)
            .cloned()
            .ok_or_else(|| ScreenError::Validation(format!("No record at index {index}")))?;
        let encryptor = self.app.encryptor()?;
        let cid = Cid::parse(&record.ipfs_hash)?;
        let blob = self.app.ipfs().download(&cid).await?;
        let envelope = EncryptedPayload::from_slice(&blob)?;
        Ok(encryptor.decrypt_bytes(&envelope).await?)
    }

    /// The envelope cached on this device for the record at `index`.
    #[must_use]
    pub fn cached_envelope(&self, index: usize) -> Option<EncryptedPayload> {
        let token_id = self.token_id()?;
        self.app.metadata().load(&token_id.to_string(), index)
    }

    /// Prescriptions issued against the token, newest last.
    pub async fn prescriptions(&self) -> Result<Vec<Prescription>, ScreenError> {
        let token_id = self.require_token()?;
        let contract = self.app.prescriptions()?;
        let mut out = Vec::new();
        for id in contract.patient_prescriptions(token_id).await? {
            out.push(contract.get(id).await?);
        }
        Ok(out)
    }

    /// Prescriptions that are past their expiry date.
    pub async fn expired_prescriptions(&self) -> Result<Vec<Prescription>, ScreenError> {
        let now = now_secs();
        Ok(self
            .prescriptions()
            .await?
            .into_iter()
            .filter(|p| p.is_expired_at(now))
            .collect())
    }

    // =========================================================================
    // ACCESS
    // =========================================================================

    /// Grant `grantee` access to the token's records.
    ///
    /// Only the on-chain grant is written; existing envelopes stay encrypted
    /// under the patient's key.
    #[instrument(skip(self))]
    pub async fn grant_access(
        &self,
        grantee: &str,
        level: AccessLevel,
    ) -> Result<TransactionReceipt, ScreenError> {
        let grantee = parse_grantee(grantee)?;
        let token_id = self.require_token()?;
        let receipt = self
            .app
            .patient_nft()?
            .grant_access(token_id, grantee, level)
            .await?;
        info!(%grantee, ?level, "Access granted");
        Ok(receipt)
    }

    #[instrument(skip(self))]
    pub async fn revoke_access(&self, grantee: &str) -> Result<TransactionReceipt, ScreenError> {
        let grantee = parse_grantee(grantee)?;
        let token_id = self.require_token()?;
        let receipt = self
            .app
            .patient_nft()?
            .revoke_access(token_id, grantee)
            .await?;
        info!(%grantee, "Access revoked");
        Ok(receipt)
    }

    /// Give an emergency contact access to the token.
    pub async fn grant_emergency_access(
        &self,
        contact: &str,
    ) -> Result<TransactionReceipt, ScreenError> {
        let contact = parse_grantee(contact)?;
        let token_id = self.require_token()?;
        Ok(self
            .app
            .patient_nft()?
            .grant_emergency_access(token_id, contact)
            .await?)
    }

    /// Level currently held by `accessor`.
    pub async fn access_level(&self, accessor: &str) -> Result<AccessLevel, ScreenError> {
        let accessor = parse_grantee(accessor)?;
        let token_id = self.require_token()?;
        Ok(self
            .app
            .patient_nft()?
            .access_level(token_id, accessor)
            .await?)
    }
}

fn parse_grantee(text: &str) -> Result<Address, ScreenError> {
    text.trim()
        .parse()
        .map_err(|_| ScreenError::Validation("Invalid Ethereum address".into()))
}

#[async_trait]
impl Screen for PatientDashboard {
    fn name(&self) -> &'static str {
        "patient"
    }

    fn state(&self) -> ScreenState {
        self.view.read().state
    }

    async fn refresh(&self) -> Result<ScreenState, ScreenError> {
        let wallet = self.app.wallet();
        if let Some(state) = session_state(&wallet) {
            *self.view.write() = PatientView {
                state,
                ..PatientView::default()
            };
            return Ok(state);
        }
        let session = wallet.require_session()?;

        let nft = self.app.patient_nft()?;
        let token_id = nft.patient_token_id(session.address).await?;
        let records = match token_id {
            Some(id) => nft.medical_records(id).await?,
            None => Vec::new(),
        };

        let state = ScreenState::connected(token_id.is_some());
        *self.view.write() = PatientView {
            state,
            token_id,
            records,
        };
        Ok(state)
    }

    fn reset(&self) {
        *self.view.write() = PatientView::default();
    }
}
