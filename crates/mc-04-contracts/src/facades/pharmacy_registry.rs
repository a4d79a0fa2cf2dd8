//! Pharmacy registration and verification.

use super::{addresses, send};
use crate::contract::ContractHandle;
use crate::domain::entities::{Pharmacy, PharmacyRegistration};
use crate::domain::errors::ContractError;
use crate::domain::rpc::TransactionReceipt;
use shared_types::Address;
use tracing::info;

/// Typed access to the pharmacy registry.
#[derive(Debug, Clone)]
pub struct PharmacyRegistry {
    handle: ContractHandle,
}

impl PharmacyRegistry {
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
        pharmacy: PharmacyRegistration,
    ) -> Result<TransactionReceipt, ContractError> {
        let address = pharmacy.pharmacy_address;
        let receipt = send(&self.handle, "registerPharmacy", &pharmacy.into_tokens()).await?;
        info!(pharmacy = %address, "Pharmacy registered");
        Ok(receipt)
    }

    pub async fn verify(&self, pharmacy: Address) -> Result<TransactionReceipt, ContractError> {
        send(&self.handle, "verifyPharmacy", &[pharmacy.into()]).await
    }

    pub async fn revoke(&self, pharmacy: Address) -> Result<TransactionReceipt, ContractError> {
        send(&self.handle, "revokePharmacy", &[pharmacy.into()]).await
    }

    pub async fn is_verified(&self, pharmacy: Address) -> Result<bool, ContractError> {
        Ok(self
            .handle
            .read_one("isVerifiedPharmacy", &[pharmacy.into()])
            .await?
            .into_bool()?)
    }

    pub async fn get(&self, pharmacy: Address) -> Result<Pharmacy, ContractError> {
        let token = self.handle.read_one("getPharmacy", &[pharmacy.into()]).await?;
        Ok(Pharmacy::from_token(token)?)
    }

    pub async fn all(&self) -> Result<Vec<Address>, ContractError> {
        addresses(self.handle.read_one("getAllPharmacies", &[]).await?)
    }
}
