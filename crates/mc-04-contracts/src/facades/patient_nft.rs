//! Patient NFT: identity token, record pointers and access grants.

use super::{event_uint, send};
use crate::abi::Token;
use crate::contract::ContractHandle;
use crate::domain::entities::{AccessLevel, MedicalRecord};
use crate::domain::errors::ContractError;
use crate::domain::rpc::TransactionReceipt;
use shared_types::{Address, U256};
use tracing::{debug, info};

/// Typed access to the patient NFT contract.
#[derive(Debug, Clone)]
pub struct PatientNft {
    handle: ContractHandle,
}

impl PatientNft {
    #[must_use]
    pub fn new(handle: ContractHandle) -> Self {
        Self { handle }
    }

    #[must_use]
    pub fn handle(&self) -> &ContractHandle {
        &self.handle
    }

    /// Mint a patient NFT and return its token id.
    pub async fn mint(&self, patient: Address) -> Result<U256, ContractError> {
        let receipt = send(&self.handle, "mintPatientNFT", &[patient.into()]).await?;
        let token_id = event_uint(&self.handle, &receipt, "PatientNFTMinted", "tokenId")?;
        info!(%patient, %token_id, "Patient NFT minted");
        Ok(token_id)
    }

    /// Append an IPFS record pointer to the patient's token.
    pub async fn add_medical_record(
        &self,
        token_id: U256,
        ipfs_hash: &str,
    ) -> Result<TransactionReceipt, ContractError> {
        send(
            &self.handle,
            "addMedicalRecord",
            &[token_id.into(), ipfs_hash.into()],
        )
        .await
    }

    pub async fn grant_access(
        &self,
        token_id: U256,
        grantee: Address,
        level: AccessLevel,
    ) -> Result<TransactionReceipt, ContractError> {
        send(
            &self.handle,
            "grantAccess",
            &[token_id.into(), grantee.into(), level.into()],
        )
        .await
    }

    pub async fn revoke_access(
        &self,
        token_id: U256,
        grantee: Address,
    ) -> Result<TransactionReceipt, ContractError> {
        send(&self.handle, "revokeAccess", &[token_id.into(), grantee.into()]).await
    }

    pub async fn grant_emergency_access(
        &self,
        token_id: U256,
        contact: Address,
    ) -> Result<TransactionReceipt, ContractError> {
        send(
            &self.handle,
            "grantEmergencyAccess",
            &[token_id.into(), contact.into()],
        )
        .await
    }

    /// The first token owned by `owner`, or `None` if they hold none.
    pub async fn patient_token_id(&self, owner: Address) -> Result<Option<U256>, ContractError> {
        let balance = self
            .handle
            .read_one("balanceOf", &[owner.into()])
            .await?
            .into_uint()?;
        if balance.is_zero() {
            debug!(%owner, "No patient NFT");
            return Ok(None);
        }
        let token_id = self
            .handle
            .read_one("tokenOfOwnerByIndex", &[owner.into(), Token::from(0u64)])
            .await?
            .into_uint()?;
        Ok(Some(token_id))
    }

    pub async fn medical_records(
        &self,
        token_id: U256,
    ) -> Result<Vec<MedicalRecord>, ContractError> {
        let records = self
            .handle
            .read_one("getMedicalRecords", &[token_id.into()])
            .await?
            .into_array()?;
        Ok(records
            .into_iter()
            .map(MedicalRecord::from_token)
            .collect::<Result<_, _>>()?)
    }

    pub async fn access_level(
        &self,
        token_id: U256,
        accessor: Address,
    ) -> Result<AccessLevel, ContractError> {
        let level = self
            .handle
            .read_one("getAccessLevel", &[token_id.into(), accessor.into()])
            .await?;
        Ok(AccessLevel::from_token(level)?)
    }

    pub async fn owner_of(&self, token_id: U256) -> Result<Address, ContractError> {
        Ok(self
            .handle
            .read_one("ownerOf", &[token_id.into()])
            .await?
            .into_address()?)
    }

    /// Whether `account` owns `token_id`. Lookup failures count as no.
    pub async fn is_token_owner(&self, token_id: U256, account: Address) -> bool {
        match self.owner_of(token_id).await {
            Ok(owner) => owner == account,
            Err(e) => {
                debug!(%token_id, error = %e, "Owner lookup failed");
                false
            }
        }
    }
}
