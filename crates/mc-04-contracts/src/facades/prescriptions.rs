//! Prescription lifecycle: issue, verify, dispense, invalidate.

use super::{event_uint, send, uints};
use crate::abi::TupleReader;
use crate::contract::ContractHandle;
use crate::domain::entities::{NewPrescription, Prescription, PrescriptionStatus, Verification};
use crate::domain::errors::ContractError;
use crate::domain::rpc::TransactionReceipt;
use shared_types::{Address, U256};
use tracing::info;

/// Typed access to the prescription contract.
#[derive(Debug, Clone)]
pub struct Prescriptions {
    handle: ContractHandle,
}

impl Prescriptions {
    #[must_use]
    pub fn new(handle: ContractHandle) -> Self {
        Self { handle }
    }

    #[must_use]
    pub fn handle(&self) -> &ContractHandle {
        &self.handle
    }

    /// Issue a prescription and return its id.
    pub async fn issue(&self, prescription: NewPrescription) -> Result<U256, ContractError> {
        let patient = prescription.patient_address;
        let receipt = send(&self.handle, "issuePrescription", &prescription.into_tokens()).await?;
        let id = event_uint(&self.handle, &receipt, "PrescriptionIssued", "prescriptionId")?;
        info!(%patient, prescription_id = %id, "Prescription issued");
        Ok(id)
    }

    pub async fn dispense(&self, id: U256) -> Result<TransactionReceipt, ContractError> {
        send(&self.handle, "dispenseMedicine", &[id.into()]).await
    }

    pub async fn invalidate(&self, id: U256) -> Result<TransactionReceipt, ContractError> {
        send(&self.handle, "invalidatePrescription", &[id.into()]).await
    }

    /// The contract's own validity verdict and message.
    pub async fn verify(&self, id: U256) -> Result<Verification, ContractError> {
        let mut r = TupleReader::from_tokens(
            self.handle.read("verifyPrescription", &[id.into()]).await?,
        );
        Ok(Verification {
            is_valid: r.bool()?,
            message: r.string()?,
        })
    }

    pub async fn get(&self, id: U256) -> Result<Prescription, ContractError> {
        let token = self.handle.read_one("getPrescription", &[id.into()]).await?;
        Ok(Prescription::from_token(token)?)
    }

    pub async fn patient_prescriptions(
        &self,
        patient_token_id: U256,
    ) -> Result<Vec<U256>, ContractError> {
        uints(
            self.handle
                .read_one("getPatientPrescriptions", &[patient_token_id.into()])
                .await?,
        )
    }

    pub async fn doctor_prescriptions(&self, doctor: Address) -> Result<Vec<U256>, ContractError> {
        uints(
            self.handle
                .read_one("getDoctorPrescriptions", &[doctor.into()])
                .await?,
        )
    }

    /// Whether the prescription's expiry is before `now` (unix seconds).
    pub async fn is_expired(&self, id: U256, now: u64) -> Result<bool, ContractError> {
        Ok(self.get(id).await?.is_expired_at(now))
    }

    pub async fn is_dispensed(&self, id: U256) -> Result<bool, ContractError> {
        Ok(self.get(id).await?.status == PrescriptionStatus::Dispensed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::Token;
    use crate::abis::ContractName;
    use crate::adapters::ScriptedTransport;
    use crate::domain::entities::MedicineCategory;
    use crate::facades::testing::*;
    use mc_01_wallet::Signer;
    use std::sync::Arc;

    fn prescriptions(signed: bool) -> (Arc<ScriptedTransport>, Prescriptions) {
        let (t, h) = handle(ContractName::PrescriptionContract, signed);
        (t, Prescriptions::new(h))
    }

    fn stored(status: u8, expiry: u64) -> Token {
        Token::Tuple(vec![
            Token::from(5u64),
            Token::from(1u64),
            Token::Address(Address::new([1; 20])),
            Token::Address(Address::new([2; 20])),
            Token::Address(Address::ZERO),
            "Amoxicillin".into(),
            "500mg".into(),
            "3x daily".into(),
            "7 days".into(),
            Token::from(3u8),
            "bafkreimeta".into(),
            Token::from(1_700_000_000u64),
            Token::from(expiry),
            Token::from(status),
        ])
    }

    #[tokio::test]
    async fn test_issue_returns_id() {
        let (t, p) = prescriptions(true);
        let topic = p.handle().abi().event("PrescriptionIssued").unwrap().topic();
        on_writes(
            &t,
            vec![(
                topic,
                vec![word(5), word(1), address_topic(wallet().address())],
                vec![],
            )],
        );
        let id = p
            .issue(NewPrescription {
                patient_token_id: U256::one(),
                patient_address: Address::new([1; 20]),
                medicine_name: "Amoxicillin".into(),
                dosage: "500mg".into(),
                frequency: "3x daily".into(),
                duration: "7 days".into(),
                category: MedicineCategory::Antibiotic,
                ipfs_hash: "bafkreimeta".into(),
                expiry_date: 1_800_000_000,
            })
            .await
            .unwrap();
        assert_eq!(id, U256::from(5u64));
        assert!(sent_selector(&t, p.handle(), "issuePrescription"));
    }

    #[tokio::test]
    async fn test_get_and_checks() {
        let (t, p) = prescriptions(false);
        on_calls(&t, p.handle(), vec![("getPrescription", vec![stored(1, 1_750_000_000)])]);
        let got = p.get(U256::from(5u64)).await.unwrap();
        assert_eq!(got.category, MedicineCategory::Antibiotic);
        assert_eq!(got.status, PrescriptionStatus::Dispensed);
        assert!(p.is_dispensed(U256::from(5u64)).await.unwrap());
        assert!(p.is_expired(U256::from(5u64), 1_760_000_000).await.unwrap());
        assert!(!p.is_expired(U256::from(5u64), 1_740_000_000).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify() {
        let (t, p) = prescriptions(false);
        on_calls(
            &t,
            p.handle(),
            vec![("verifyPrescription", vec![Token::Bool(false), "Prescription expired".into()])],
        );
        let v = p.verify(U256::one()).await.unwrap();
        assert!(!v.is_valid);
        assert_eq!(v.message, "Prescription expired");
    }

    #[tokio::test]
    async fn test_lists() {
        let (t, p) = prescriptions(false);
        on_calls(
            &t,
            p.handle(),
            vec![
                (
                    "getPatientPrescriptions",
                    vec![Token::Array(vec![Token::from(1u64), Token::from(4u64)])],
                ),
                ("getDoctorPrescriptions", vec![Token::Array(vec![])]),
            ],
        );
        assert_eq!(
            p.patient_prescriptions(U256::one()).await.unwrap(),
            vec![U256::from(1u64), U256::from(4u64)]
        );
        assert!(p.doctor_prescriptions(Address::ZERO).await.unwrap().is_empty());
    }
}
