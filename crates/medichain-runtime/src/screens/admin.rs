//! # Admin Dashboard
//!
//! Registers and verifies doctors and pharmacies, and summarizes the
//! registries.
//!
//! A doctor's credential document, when given, is pinned before the
//! registration transaction and referenced from it as `ipfs://{cid}`.

use super::file::RecordFile;
use super::state::{ScreenError, ScreenState};
use super::{session_state, Screen};
use crate::container::AppContainer;
use async_trait::async_trait;
use mc_04_contracts::{DoctorRegistration, PharmacyRegistration, TransactionReceipt};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared_types::Address;
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorForm {
    pub doctor_address: String,
    pub name: String,
    pub specialization: String,
    pub license_number: String,
    pub hospital_affiliation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PharmacyForm {
    pub pharmacy_address: String,
    pub name: String,
    pub license_number: String,
    pub location: String,
    /// Defaults to the pharmacy address when blank.
    #[serde(default)]
    pub owner: String,
}

/// Registry counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub doctors: usize,
    pub verified_doctors: usize,
    pub pharmacies: usize,
    pub verified_pharmacies: usize,
}

fn address_field(label: &str, value: &str) -> Result<Address, ScreenError> {
    value
        .trim()
        .parse()
        .map_err(|_| ScreenError::Validation(format!("Invalid {label} address")))
}

fn required(fields: &[(&str, &str)]) -> Result<(), ScreenError> {
    match fields.iter().find(|(_, v)| v.trim().is_empty()) {
        Some((label, _)) => Err(ScreenError::Validation(format!("{label} is required"))),
        None => Ok(()),
    }
}

#[derive(Debug, Clone)]
struct AdminView {
    state: ScreenState,
    stats: PlatformStats,
}

impl Default for AdminView {
    fn default() -> Self {
        Self {
            state: ScreenState::Disconnected,
            stats: PlatformStats::default(),
        }
    }
}

pub struct AdminDashboard {
    app: Arc<AppContainer>,
    view: RwLock<AdminView>,
}

impl AdminDashboard {
    pub fn new(app: Arc<AppContainer>) -> Self {
        Self {
            app,
            view: RwLock::new(AdminView::default()),
        }
    }

    /// Counts from the last refresh.
    #[must_use]
    pub fn stats(&self) -> PlatformStats {
        self.view.read().stats
    }

    // =========================================================================
    // DOCTORS
    // =========================================================================

    #[instrument(skip(self, form, credential), fields(doctor = %form.doctor_address))]
    pub async fn register_doctor(
        &self,
        form: &DoctorForm,
        credential: Option<&RecordFile>,
    ) -> Result<TransactionReceipt, ScreenError> {
        self.app.wallet().require_session()?;
        let doctor_address = address_field("doctor", &form.doctor_address)?;
        required(&[
            ("Name", &form.name),
            ("Specialization", &form.specialization),
            ("License number", &form.license_number),
            ("Hospital affiliation", &form.hospital_affiliation),
        ])?;

        let metadata_uri = match credential {
            Some(file) => {
                file.validate_record()?;
                let pinned = self
                    .app
                    .ipfs()
                    .upload(file.data.clone(), &file.name, &file.content_type)
                    .await?;
                debug!(cid = %pinned.cid, "Credential pinned");
                format!("ipfs://{}", pinned.cid)
            }
            None => String::new(),
        };

        let receipt = self
            .app
            .doctor_registry()?
            .register(DoctorRegistration {
                doctor_address,
                name: form.name.trim().to_string(),
                specialization: form.specialization.trim().to_string(),
                license_number: form.license_number.trim().to_string(),
                hospital_affiliation: form.hospital_affiliation.trim().to_string(),
                metadata_uri,
            })
            .await?;
        Ok(receipt)
    }

    pub async fn verify_doctor(&self, doctor: &str) -> Result<TransactionReceipt, ScreenError> {
        let doctor = address_field("doctor", doctor)?;
        Ok(self.app.doctor_registry()?.verify(doctor).await?)
    }

    pub async fn revoke_doctor(&self, doctor: &str) -> Result<TransactionReceipt, ScreenError> {
        let doctor = address_field("doctor", doctor)?;
        Ok(self.app.doctor_registry()?.revoke(doctor).await?)
    }

    // =========================================================================
    // PHARMACIES
    // =========================================================================

    #[instrument(skip(self, form), fields(pharmacy = %form.pharmacy_address))]
    pub async fn register_pharmacy(
        &self,
        form: &PharmacyForm,
    ) -> Result<TransactionReceipt, ScreenError> {
        self.app.wallet().require_session()?;
        let pharmacy_address = address_field("pharmacy", &form.pharmacy_address)?;
        let owner = if form.owner.trim().is_empty() {
            pharmacy_address
        } else {
            address_field("owner", &form.owner)?
        };
        required(&[
            ("Name", &form.name),
            ("License number", &form.license_number),
            ("Location", &form.location),
        ])?;

        Ok(self
            .app
            .pharmacy_registry()?
            .register(PharmacyRegistration {
                pharmacy_address,
                name: form.name.trim().to_string(),
                license_number: form.license_number.trim().to_string(),
                location: form.location.trim().to_string(),
                owner,
            })
            .await?)
    }

    pub async fn verify_pharmacy(&self, pharmacy: &str) -> Result<TransactionReceipt, ScreenError> {
        let pharmacy = address_field("pharmacy", pharmacy)?;
        Ok(self.app.pharmacy_registry()?.verify(pharmacy).await?)
    }

    pub async fn revoke_pharmacy(&self, pharmacy: &str) -> Result<TransactionReceipt, ScreenError> {
        let pharmacy = address_field("pharmacy", pharmacy)?;
        Ok(self.app.pharmacy_registry()?.revoke(pharmacy).await?)
    }

    // =========================================================================
    // STATS
    // =========================================================================

    async fn load_stats(&self) -> Result<PlatformStats, ScreenError> {
        let doctors = self.app.doctor_registry()?;
        let pharmacies = self.app.pharmacy_registry()?;

        let mut stats = PlatformStats::default();
        for doctor in doctors.all().await? {
            stats.doctors += 1;
            if doctors.is_verified(doctor).await? {
                stats.verified_doctors += 1;
            }
        }
        for pharmacy in pharmacies.all().await? {
            stats.pharmacies += 1;
            if pharmacies.is_verified(pharmacy).await? {
                stats.verified_pharmacies += 1;
            }
        }
        Ok(stats)
    }
}

#[async_trait]
impl Screen for AdminDashboard {
    fn name(&self) -> &'static str {
        "admin"
    }

    fn state(&self) -> ScreenState {
        self.view.read().state
    }

    async fn refresh(&self) -> Result<ScreenState, ScreenError> {
        if let Some(state) = session_state(&self.app.wallet()) {
            *self.view.write() = AdminView {
                state,
                ..AdminView::default()
            };
            return Ok(state);
        }
        let stats = self.load_stats().await?;
        info!(
            doctors = stats.doctors,
            pharmacies = stats.pharmacies,
            "Registry stats loaded"
        );
        let state = ScreenState::ConnectedRegistered;
        *self.view.write() = AdminView { state, stats };
        Ok(state)
    }

    fn reset(&self) {
        *self.view.write() = AdminView::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use mc_04_contracts::{ContractName, Token};

    const DOCTOR: &str = "0x1111111111111111111111111111111111111111";
    const PHARMACY: &str = "0x2222222222222222222222222222222222222222";

    fn doctor_form() -> DoctorForm {
        DoctorForm {
            doctor_address: DOCTOR.into(),
            name: "Dr. House".into(),
            specialization: "Diagnostics".into(),
            license_number: "LIC-42".into(),
            hospital_affiliation: "Princeton-Plainsboro".into(),
        }
    }

    fn pharmacy_form() -> PharmacyForm {
        PharmacyForm {
            pharmacy_address: PHARMACY.into(),
            name: "Corner Drugs".into(),
            license_number: "PH-9".into(),
            location: "Main St".into(),
            owner: String::new(),
        }
    }

    #[tokio::test]
    async fn test_register_doctor_with_credential() {
        let h = Harness::new(0x71);
        h.connect().await;
        let screen = AdminDashboard::new(h.container.clone());
        let credential = RecordFile::new("license.pdf", "application/pdf", b"%PDF".to_vec());

        screen
            .register_doctor(&doctor_form(), Some(&credential))
            .await
            .unwrap();
        assert_eq!(h.ipfs.pin_count(), 1);
        assert_eq!(h.sent(ContractName::DoctorRegistry, "registerDoctor"), 1);
    }

    #[tokio::test]
    async fn test_bad_credential_stops_before_chain() {
        let h = Harness::new(0x71);
        h.connect().await;
        let screen = AdminDashboard::new(h.container.clone());
        let credential = RecordFile::new("license.exe", "application/x-msdownload", vec![1]);

        assert!(screen
            .register_doctor(&doctor_form(), Some(&credential))
            .await
            .is_err());
        assert_eq!(h.ipfs.pin_count(), 0);
        assert_eq!(h.sent(ContractName::DoctorRegistry, "registerDoctor"), 0);
    }

    #[tokio::test]
    async fn test_form_validation() {
        let h = Harness::new(0x71);
        h.connect().await;
        let screen = AdminDashboard::new(h.container.clone());

        let mut form = doctor_form();
        form.doctor_address = "nope".into();
        let err = screen.register_doctor(&form, None).await.unwrap_err();
        assert_eq!(err.message(), "Invalid doctor address");

        let mut form = pharmacy_form();
        form.location = " ".into();
        let err = screen.register_pharmacy(&form).await.unwrap_err();
        assert_eq!(err.message(), "Location is required");
        assert_eq!(h.chain.sent_total(), 0);
    }

    #[tokio::test]
    async fn test_register_and_verify_pharmacy() {
        let h = Harness::new(0x71);
        h.connect().await;
        let screen = AdminDashboard::new(h.container.clone());
        screen.register_pharmacy(&pharmacy_form()).await.unwrap();
        screen.verify_pharmacy(PHARMACY).await.unwrap();
        screen.revoke_doctor(DOCTOR).await.unwrap();
        assert_eq!(h.sent(ContractName::PharmacyRegistry, "registerPharmacy"), 1);
        assert_eq!(h.sent(ContractName::PharmacyRegistry, "verifyPharmacy"), 1);
        assert_eq!(h.sent(ContractName::DoctorRegistry, "revokeDoctor"), 1);
    }

    #[tokio::test]
    async fn test_refresh_counts_registries() {
        let h = Harness::new(0x71);
        let screen = AdminDashboard::new(h.container.clone());
        assert_eq!(screen.refresh().await.unwrap(), ScreenState::Disconnected);

        h.connect().await;
        let doctor: Address = DOCTOR.parse().unwrap();
        let pharmacy: Address = PHARMACY.parse().unwrap();
        h.answer(
            ContractName::DoctorRegistry,
            "getAllDoctors",
            vec![Token::Array(vec![doctor.into(), doctor.into()])],
        );
        h.answer(ContractName::DoctorRegistry, "isVerifiedDoctor", vec![Token::Bool(true)]);
        h.answer(
            ContractName::PharmacyRegistry,
            "getAllPharmacies",
            vec![Token::Array(vec![pharmacy.into()])],
        );
        h.answer(
            ContractName::PharmacyRegistry,
            "isVerifiedPharmacy",
            vec![Token::Bool(false)],
        );

        assert_eq!(
            screen.refresh().await.unwrap(),
            ScreenState::ConnectedRegistered
        );
        assert_eq!(
            screen.stats(),
            PlatformStats {
                doctors: 2,
                verified_doctors: 2,
                pharmacies: 1,
                verified_pharmacies: 0,
            }
        );

        screen.reset();
        assert_eq!(screen.stats(), PlatformStats::default());
    }
}
