//! # Contract Interfaces
//!
//! The deployed MediChain contracts and the ABI fragments the client uses
//! for each of them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five logical contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContractName {
    #[serde(rename = "patientNFT")]
    PatientNft,
    #[serde(rename = "prescriptionContract")]
    PrescriptionContract,
    #[serde(rename = "doctorRegistry")]
    DoctorRegistry,
    #[serde(rename = "pharmacyRegistry")]
    PharmacyRegistry,
    #[serde(rename = "governance")]
    Governance,
}

impl ContractName {
    pub const ALL: [ContractName; 5] = [
        Self::PatientNft,
        Self::PrescriptionContract,
        Self::DoctorRegistry,
        Self::PharmacyRegistry,
        Self::Governance,
    ];

    /// Key used in configuration and messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PatientNft => "patientNFT",
            Self::PrescriptionContract => "prescriptionContract",
            Self::DoctorRegistry => "doctorRegistry",
            Self::PharmacyRegistry => "pharmacyRegistry",
            Self::Governance => "governance",
        }
    }

    /// ABI fragments for this contract.
    #[must_use]
    pub const fn abi(self) -> &'static [&'static str] {
        match self {
            Self::PatientNft => PATIENT_NFT_ABI,
            Self::PrescriptionContract => PRESCRIPTION_CONTRACT_ABI,
            Self::DoctorRegistry => DOCTOR_REGISTRY_ABI,
            Self::PharmacyRegistry => PHARMACY_REGISTRY_ABI,
            Self::Governance => GOVERNANCE_ABI,
        }
    }
}

impl fmt::Display for ContractName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const PATIENT_NFT_ABI: &[&str] = &[
    "function mintPatientNFT(address patient) external returns (uint256)",
    "function addMedicalRecord(uint256 tokenId, string calldata ipfsHash) external",
    "function grantAccess(uint256 tokenId, address grantee, uint8 level) external",
    "function revokeAccess(uint256 tokenId, address grantee) external",
    "function grantEmergencyAccess(uint256 tokenId, address emergencyContact) external",
    "function getAccessLevel(uint256 tokenId, address accessor) external view returns (uint8)",
    "function getMedicalRecords(uint256 tokenId) external view returns (tuple(string ipfsHash, uint256 timestamp, address addedBy, bool isActive)[])",
    "function ownerOf(uint256 tokenId) external view returns (address)",
    "function balanceOf(address owner) external view returns (uint256)",
    "function tokenOfOwnerByIndex(address owner, uint256 index) external view returns (uint256)",
    "event PatientNFTMinted(uint256 indexed tokenId, address indexed patient)",
    "event MedicalRecordAdded(uint256 indexed tokenId, string ipfsHash, address indexed addedBy)",
    "event AccessGranted(uint256 indexed tokenId, address indexed grantee, uint8 level)",
    "event AccessRevoked(uint256 indexed tokenId, address indexed grantee)",
];

pub const PRESCRIPTION_CONTRACT_ABI: &[&str] = &[
    "function issuePrescription(uint256 patientTokenId, address patientAddress, string calldata medicineName, string calldata dosage, string calldata frequency, string calldata duration, uint8 category, string calldata ipfsHash, uint256 expiryDate) external returns (uint256)",
    "function dispenseMedicine(uint256 prescriptionId) external",
    "function invalidatePrescription(uint256 prescriptionId) external",
    "function verifyPrescription(uint256 prescriptionId) external view returns (bool, string memory)",
    "function getPrescription(uint256 prescriptionId) external view returns (tuple(uint256 id, uint256 patientTokenId, address patientAddress, address doctorAddress, address pharmacyAddress, string medicineName, string dosage, string frequency, string duration, uint8 category, string ipfsHash, uint256 issuedDate, uint256 expiryDate, uint8 status))",
    "function getPatientPrescriptions(uint256 patientTokenId) external view returns (uint256[])",
    "function getDoctorPrescriptions(address doctor) external view returns (uint256[])",
    "event PrescriptionIssued(uint256 indexed prescriptionId, uint256 indexed patientTokenId, address indexed doctor)",
    "event MedicineDispensed(uint256 indexed prescriptionId, address indexed pharmacy)",
    "event PrescriptionInvalidated(uint256 indexed prescriptionId)",
];

pub const DOCTOR_REGISTRY_ABI: &[&str] = &[
    "function registerDoctor(address doctorAddress, string calldata name, string calldata specialization, string calldata licenseNumber, string calldata hospitalAffiliation, string calldata metadataURI) external",
    "function verifyDoctor(address doctorAddress) external",
    "function revokeDoctor(address doctorAddress) external",
    "function isVerifiedDoctor(address doctorAddress) external view returns (bool)",
    "function getDoctor(address doctorAddress) external view returns (tuple(address doctorAddress, string name, string specialization, string licenseNumber, string hospitalAffiliation, bool isVerified, uint256 registrationDate, string metadataURI))",
    "function getAllDoctors() external view returns (address[])",
    "event DoctorRegistered(address indexed doctorAddress, string licenseNumber)",
    "event DoctorVerified(address indexed doctorAddress)",
    "event DoctorRevoked(address indexed doctorAddress)",
];

pub const PHARMACY_REGISTRY_ABI: &[&str] = &[
    "function registerPharmacy(address pharmacyAddress, string calldata name, string calldata licenseNumber, string calldata location, address owner) external",
    "function verifyPharmacy(address pharmacyAddress) external",
    "function revokePharmacy(address pharmacyAddress) external",
    "function isVerifiedPharmacy(address pharmacyAddress) external view returns (bool)",
    "function getPharmacy(address pharmacyAddress) external view returns (tuple(address pharmacyAddress, string name, string licenseNumber, string location, address owner, bool isVerified, uint256 registrationDate))",
    "function getAllPharmacies() external view returns (address[])",
    "event PharmacyRegistered(address indexed pharmacyAddress, string licenseNumber)",
    "event PharmacyVerified(address indexed pharmacyAddress)",
    "event PharmacyRevoked(address indexed pharmacyAddress)",
];

pub const GOVERNANCE_ABI: &[&str] = &[
    "function createProposal(string calldata description) external returns (uint256)",
    "function vote(uint256 proposalId, bool support) external",
    "function executeProposal(uint256 proposalId) external",
    "function cancelProposal(uint256 proposalId) external",
    "function getProposal(uint256 proposalId) external view returns (tuple(uint256 id, address proposer, string description, uint256 votesFor, uint256 votesAgainst, uint256 startTime, uint256 endTime, bool executed, bool cancelled))",
    "function getProposalState(uint256 proposalId) external view returns (uint8)",
    "function getVotingPower(address account) external view returns (uint256)",
    "function hasVoted(uint256 proposalId, address account) external view returns (bool)",
    "event ProposalCreated(uint256 indexed proposalId, address indexed proposer)",
    "event VoteCast(uint256 indexed proposalId, address indexed voter, bool support, uint256 weight)",
    "event ProposalExecuted(uint256 indexed proposalId)",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::Abi;

    #[test]
    fn test_every_abi_parses() {
        for name in ContractName::ALL {
            let abi = Abi::parse(name.abi()).unwrap_or_else(|e| panic!("{name}: {e}"));
            assert!(abi.functions().count() > 0, "{name} has no functions");
        }
    }

    #[test]
    fn test_prescription_tuple_shape() {
        let abi = Abi::parse(PRESCRIPTION_CONTRACT_ABI).unwrap();
        let get = abi.function("getPrescription").unwrap();
        assert_eq!(
            get.outputs[0].kind.to_string(),
            "(uint256,uint256,address,address,address,string,string,string,string,uint8,string,uint256,uint256,uint8)"
        );
        let issue = abi.function("issuePrescription").unwrap();
        assert_eq!(issue.inputs.len(), 9);
    }

    #[test]
    fn test_names_roundtrip_serde() {
        let json = serde_json::to_string(&ContractName::PatientNft).unwrap();
        assert_eq!(json, "\"patientNFT\"");
        assert_eq!(ContractName::Governance.to_string(), "governance");
    }
}
