//! Doctor registration and verification.

use super::{addresses, send};
use crate::contract::ContractHandle;
use crate::domain::entities::{Doctor, DoctorRegistration};
use crate::domain::errors::ContractError;
use crate::domain::rpc::TransactionReceipt;
use shared_types::Address;
use tracing::info;

/// Typed access to the doctor registry.
#[derive(Debug, Clone)]
pub struct DoctorRegistry {
    handle: ContractHandle,
}

impl DoctorRegistry {
    #[must_use]
    pub fn new(handle: ContractHandle) -> Self {
        Self { handle }
    }

    #[must_use]
    pub fn handle(&self) -> &ContractHandle {
        &self.handle
    }

    pub async fn register(
        &self,
        doctor: DoctorRegistration,
    ) -> Result<TransactionReceipt, ContractError> {
        let address = doctor.doctor_address;
        let receipt = send(&self.handle, "registerDoctor", &doctor.into_tokens()).await?;
        info!(doctor = %address, "Doctor registered");
        Ok(receipt)
    }

    pub async fn verify(&self, doctor: Address) -> Result<TransactionReceipt, ContractError> {
        send(&self.handle, "verifyDoctor", &[doctor.into()]).await
    }

    pub async fn revoke(&self, doctor: Address) -> Result<TransactionReceipt, ContractError> {
        send(&self.handle, "revokeDoctor", &[doctor.into()]).await
    }

    pub async fn is_verified(&self, doctor: Address) -> Result<bool, ContractError> {
        Ok(self
            .handle
            .read_one("isVerifiedDoctor", &[doctor.into()])
            .await?
            .into_bool()?)
    }

    pub async fn get(&self, doctor: Address) -> Result<Doctor, ContractError> {
        let token = self.handle.read_one("getDoctor", &[doctor.into()]).await?;
        Ok(Doctor::from_token(token)?)
    }

    /// Every registered doctor address, verified or not.
    pub async fn all(&self) -> Result<Vec<Address>, ContractError> {
        addresses(self.handle.read_one("getAllDoctors", &[]).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::Token;
    use crate::abis::ContractName;
    use crate::facades::testing::*;

    #[tokio::test]
    async fn test_reads() {
        let (t, h) = handle(ContractName::DoctorRegistry, false);
        let registry = DoctorRegistry::new(h);
        let doc = Address::new([0xd0; 20]);
        on_calls(
            &t,
            registry.handle(),
            vec![
                ("isVerifiedDoctor", vec![Token::Bool(true)]),
                (
                    "getDoctor",
                    vec![Token::Tuple(vec![
                        Token::Address(doc),
                        "Dr. Rao".into(),
                        "Cardiology".into(),
                        "MED-001".into(),
                        "City Hospital".into(),
                        Token::Bool(true),
                        Token::from(1_700_000_000u64),
                        "ipfs://bafkreicred".into(),
                    ])],
                ),
                ("getAllDoctors", vec![Token::Array(vec![Token::Address(doc)])]),
            ],
        );
        assert!(registry.is_verified(doc).await.unwrap());
        let got = registry.get(doc).await.unwrap();
        assert_eq!(got.specialization, "Cardiology");
        assert_eq!(got.metadata_uri, "ipfs://bafkreicred");
        assert_eq!(registry.all().await.unwrap(), vec![doc]);
    }

    #[tokio::test]
    async fn test_register_sends() {
        let (t, h) = handle(ContractName::DoctorRegistry, true);
        let registry = DoctorRegistry::new(h);
        on_writes(&t, vec![]);
        registry
            .register(DoctorRegistration {
                doctor_address: Address::new([0xd0; 20]),
                name: "Dr. Rao".into(),
                specialization: "Cardiology".into(),
                license_number: "MED-001".into(),
                hospital_affiliation: "City Hospital".into(),
                metadata_uri: String::new(),
            })
            .await
            .unwrap();
        assert!(sent_selector(&t, registry.handle(), "registerDoctor"));
        assert_eq!(t.count("eth_sendRawTransaction"), 1);
    }
}
