//! # Contract Registry
//!
//! Deployed addresses per [`ContractName`] plus the parsed ABIs. Binding a
//! contract without a configured address fails with
//! [`ContractError::AddressNotConfigured`].

use crate::abi::{Abi, AbiError};
use crate::abis::ContractName;
use crate::contract::ContractHandle;
use crate::domain::errors::ContractError;
use crate::provider::Provider;
use mc_01_wallet::Signer;
use serde::{Deserialize, Serialize};
use shared_types::Address;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Deployed contract addresses. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractAddresses {
    #[serde(rename = "patientNFT")]
    pub patient_nft: Option<Address>,
    #[serde(rename = "prescriptionContract")]
    pub prescription_contract: Option<Address>,
    #[serde(rename = "doctorRegistry")]
    pub doctor_registry: Option<Address>,
    #[serde(rename = "pharmacyRegistry")]
    pub pharmacy_registry: Option<Address>,
    pub governance: Option<Address>,
}

impl ContractAddresses {
    #[must_use]
    pub fn get(&self, name: ContractName) -> Option<Address> {
        match name {
            ContractName::PatientNft => self.patient_nft,
            ContractName::PrescriptionContract => self.prescription_contract,
            ContractName::DoctorRegistry => self.doctor_registry,
            ContractName::PharmacyRegistry => self.pharmacy_registry,
            ContractName::Governance => self.governance,
        }
    }

    pub fn set(&mut self, name: ContractName, address: Option<Address>) {
        let slot = match name {
            ContractName::PatientNft => &mut self.patient_nft,
            ContractName::PrescriptionContract => &mut self.prescription_contract,
            ContractName::DoctorRegistry => &mut self.doctor_registry,
            ContractName::PharmacyRegistry => &mut self.pharmacy_registry,
            ContractName::Governance => &mut self.governance,
        };
        *slot = address;
    }

    /// Contracts with no address.
    #[must_use]
    pub fn missing(&self) -> Vec<ContractName> {
        ContractName::ALL
            .into_iter()
            .filter(|n| self.get(*n).is_none())
            .collect()
    }
}

/// Addresses plus parsed ABIs for all five contracts.
#[derive(Debug, Clone)]
pub struct ContractRegistry {
    addresses: ContractAddresses,
    abis: BTreeMap<ContractName, Arc<Abi>>,
}

impl ContractRegistry {
    /// Parse every ABI up front.
    pub fn new(addresses: ContractAddresses) -> Result<Self, AbiError> {
        let mut abis = BTreeMap::new();
        for name in ContractName::ALL {
            abis.insert(name, Arc::new(Abi::parse(name.abi())?));
        }
        Ok(Self { addresses, abis })
    }

    #[must_use]
    pub fn addresses(&self) -> &ContractAddresses {
        &self.addresses
    }

    /// Deployed address of `name`.
    pub fn address(&self, name: ContractName) -> Result<Address, ContractError> {
        self.addresses
            .get(name)
            .ok_or(ContractError::AddressNotConfigured(name))
    }

    /// Parsed ABI of `name`.
    pub fn abi(&self, name: ContractName) -> Result<Arc<Abi>, ContractError> {
        self.abis
            .get(&name)
            .cloned()
            .ok_or(ContractError::AddressNotConfigured(name))
    }

    /// A handle for `name`, signing with `signer` when given.
    pub fn bind(
        &self,
        name: ContractName,
        provider: &Provider,
        signer: Option<Arc<dyn Signer>>,
    ) -> Result<ContractHandle, ContractError> {
        Ok(ContractHandle::new(
            name,
            self.address(name)?,
            self.abi(name)?,
            provider.clone(),
            signer,
        ))
    }
}
