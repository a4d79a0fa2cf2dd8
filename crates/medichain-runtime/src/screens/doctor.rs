//! # Doctor Dashboard
//!
//! Verified doctors issue prescriptions and read the records of patients who
//! granted them access.
//!
//! Issuing pins a metadata document first and then writes its CID on chain,
//! so a prescription never references content that does not exist.

use super::state::{ScreenError, ScreenState};
use super::{now_secs, session_state, Screen};
use crate::container::AppContainer;
use crate::qr::{parse_id, HealthPassport, PrescriptionCode};
use async_trait::async_trait;
use mc_04_contracts::{
    Doctor, MedicalRecord, MedicineCategory, NewPrescription, Prescription, TransactionReceipt,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Cid, U256};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Seconds per day.
const DAY: u64 = 86_400;

/// Longest validity a prescription can be issued with.
pub const MAX_VALIDITY_DAYS: u32 = 365;

/// What the doctor fills in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionForm {
    pub patient_token_id: String,
    pub patient_address: String,
    pub medicine_name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub category: MedicineCategory,
    pub validity_days: u32,
    #[serde(default)]
    pub notes: String,
}

/// Parsed, checked form.
struct ValidForm {
    patient_token_id: U256,
    patient_address: Address,
    validity_days: u32,
}

impl PrescriptionForm {
    fn validate(&self) -> Result<ValidForm, ScreenError> {
        let patient_token_id = parse_id(&self.patient_token_id)
            .map_err(|_| ScreenError::Validation("Invalid patient token ID".into()))?;
        let patient_address = self
            .patient_address
            .trim()
            .parse()
            .map_err(|_| ScreenError::Validation("Invalid patient address".into()))?;
        for (label, value) in [
            ("Medicine name", &self.medicine_name),
            ("Dosage", &self.dosage),
            ("Frequency", &self.frequency),
            ("Duration", &self.duration),
        ] {
            if value.trim().is_empty() {
                return Err(ScreenError::Validation(format!("{label} is required")));
            }
        }
        if !(1..=MAX_VALIDITY_DAYS).contains(&self.validity_days) {
            return Err(ScreenError::Validation(format!(
                "Validity must be between 1 and {MAX_VALIDITY_DAYS} days"
            )));
        }
        Ok(ValidForm {
            patient_token_id,
            patient_address,
            validity_days: self.validity_days,
        })
    }
}

/// JSON document pinned alongside each prescription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionMetadata {
    pub medicine_name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub category: MedicineCategory,
    pub notes: String,
    pub doctor: Address,
    pub patient_token_id: String,
    /// Unix seconds.
    pub issued_at: u64,
    /// Unix seconds.
    pub expires_at: u64,
}

/// Outcome of issuing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedPrescription {
    pub id: U256,
    pub metadata_cid: Cid,
    pub expiry_date: u64,
    /// Payload for the prescription QR.
    pub code: PrescriptionCode,
}

#[derive(Debug, Clone)]
struct DoctorView {
    state: ScreenState,
    verified: bool,
    profile: Option<Doctor>,
    issued: Vec<U256>,
}

impl Default for DoctorView {
    fn default() -> Self {
        Self {
            state: ScreenState::Disconnected,
            verified: false,
            profile: None,
            issued: Vec::new(),
        }
    }
}

pub struct DoctorDashboard {
    app: Arc<AppContainer>,
    view: RwLock<DoctorView>,
}

impl DoctorDashboard {
    pub fn new(app: Arc<AppContainer>) -> Self {
        Self {
            app,
            view: RwLock::new(DoctorView::default()),
        }
    }

    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.view.read().verified
    }

    #[must_use]
    pub fn profile(&self) -> Option<Doctor> {
        self.view.read().profile.clone()
    }

    /// Ids of prescriptions this doctor issued.
    #[must_use]
    pub fn issued(&self) -> Vec<U256> {
        self.view.read().issued.clone()
    }

    /// Validate the form, pin its metadata and issue on chain.
    #[instrument(skip(self, form), fields(medicine = %form.medicine_name))]
    pub async fn issue_prescription(
        &self,
        form: &PrescriptionForm,
    ) -> Result<IssuedPrescription, ScreenError> {
        let session = self.app.wallet().require_session()?;
        let valid = form.validate()?;
        if !self.is_verified() {
            return Err(ScreenError::Validation(
                "Only verified doctors can issue prescriptions".into(),
            ));
        }
        let contract = self.app.prescriptions()?;

        let issued_at = now_secs();
        let expiry_date = issued_at + u64::from(valid.validity_days) * DAY;
        let metadata = PrescriptionMetadata {
            medicine_name: form.medicine_name.trim().to_string(),
            dosage: form.dosage.trim().to_string(),
            frequency: form.frequency.trim().to_string(),
            duration: form.duration.trim().to_string(),
            category: form.category,
            notes: form.notes.clone(),
            doctor: session.address,
            patient_token_id: valid.patient_token_id.to_string(),
            issued_at,
            expires_at: expiry_date,
        };
        let file_name = format!("prescription_{}_{issued_at}.json", valid.patient_token_id);
        let pinned = self.app.ipfs().upload_json(&metadata, &file_name).await?;
        debug!(cid = %pinned.cid, "Prescription metadata pinned");

        let id = contract
            .issue(NewPrescription {
                patient_token_id: valid.patient_token_id,
                patient_address: valid.patient_address,
                medicine_name: metadata.medicine_name,
                dosage: metadata.dosage,
                frequency: metadata.frequency,
                duration: metadata.duration,
                category: metadata.category,
                ipfs_hash: pinned.cid.to_string(),
                expiry_date,
            })
            .await?;
        info!(prescription_id = %id, "Prescription issued");

        self.view.write().issued.push(id);
        Ok(IssuedPrescription {
            id,
            metadata_cid: pinned.cid,
            expiry_date,
            code: PrescriptionCode::new(id),
        })
    }

    /// Invalidate a prescription this doctor issued.
    pub async fn invalidate_prescription(
        &self,
        id: U256,
    ) -> Result<TransactionReceipt, ScreenError> {
        Ok(self.app.prescriptions()?.invalidate(id).await?)
    }

    /// Full details of the issued prescriptions.
    pub async fn issued_prescriptions(&self) -> Result<Vec<Prescription>, ScreenError> {
        let contract = self.app.prescriptions()?;
        let mut out = Vec::new();
        for id in self.issued() {
            out.push(contract.get(id).await?);
        }
        Ok(out)
    }

    /// Read a scanned health passport.
    pub fn scan_passport(&self, text: &str) -> Result<HealthPassport, ScreenError> {
        HealthPassport::parse(text)
    }

    /// Active records of a patient who granted this doctor at least read access.
    #[instrument(skip(self))]
    pub async fn view_patient_records(
        &self,
        token_id: U256,
    ) -> Result<Vec<MedicalRecord>, ScreenError> {
        let session = self.app.wallet().require_session()?;
        let nft = self.app.patient_nft()?;
        let level = nft.access_level(token_id, session.address).await?;
        if !level.can_read() {
            return Err(ScreenError::AccessDenied);
        }
        Ok(nft
            .medical_records(token_id)
            .await?
            .into_iter()
            .filter(|r| r.is_active)
            .collect())
    }
}

#[async_trait]
impl Screen for DoctorDashboard {
    fn name(&self) -> &'static str {
        "doctor"
    }

    fn state(&self) -> ScreenState {
        self.view.read().state
    }

    async fn refresh(&self) -> Result<ScreenState, ScreenError> {
        let wallet = self.app.wallet();
        if let Some(state) = session_state(&wallet) {
            *self.view.write() = DoctorView {
                state,
                ..DoctorView::default()
            };
            return Ok(state);
        }
        let me = wallet.require_session()?.address;

        let registry = self.app.doctor_registry()?;
        let verified = registry.is_verified(me).await?;
        let profile = if verified {
            Some(registry.get(me).await?)
        } else {
            None
        };
        let issued = self.app.prescriptions()?.doctor_prescriptions(me).await?;

        let state = ScreenState::connected(verified);
        *self.view.write() = DoctorView {
            state,
            verified,
            profile,
            issued,
        };
        Ok(state)
    }

    fn reset(&self) {
        *self.view.write() = DoctorView::default();
    }
}
