//! # Contract Entities
//!
//! On-chain enums and the structs decoded from ABI tuples.

use crate::abi::{AbiError, Token, TupleReader};
use serde::{Deserialize, Serialize};
use shared_types::{Address, U256};
use std::fmt;

macro_rules! chain_enum {
    ($name:ident, $kind:literal, { $($variant:ident = $value:literal => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(u8)]
        pub enum $name {
            $($variant = $value),+
        }

        impl $name {
            /// Every variant in on-chain order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            /// Convert from the on-chain `uint8`.
            pub fn from_u8(value: u8) -> Result<Self, AbiError> {
                match value {
                    $($value => Ok(Self::$variant),)+
                    other => Err(AbiError::InvalidEnum { kind: $kind, value: u64::from(other) }),
                }
            }

            /// Decode from a returned token.
            pub fn from_token(token: Token) -> Result<Self, AbiError> {
                let value = token.into_u64()?;
                u8::try_from(value)
                    .map_err(|_| AbiError::InvalidEnum { kind: $kind, value })
                    .and_then(Self::from_u8)
            }

            /// The on-chain `uint8`.
            #[must_use]
            pub const fn as_u8(self) -> u8 {
                self as u8
            }

            /// Human-readable label.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl From<$name> for Token {
            fn from(v: $name) -> Self {
                Token::from(v.as_u8())
            }
        }
    };
}

chain_enum!(AccessLevel, "access level", {
    None = 0 => "None",
    Read = 1 => "Read",
    Write = 2 => "Write",
    Full = 3 => "Full",
});

chain_enum!(PrescriptionStatus, "prescription status", {
    Active = 0 => "Active",
    Dispensed = 1 => "Dispensed",
    Expired = 2 => "Expired",
    Invalidated = 3 => "Invalidated",
});

chain_enum!(MedicineCategory, "medicine category", {
    General = 0 => "General",
    Controlled = 1 => "Controlled",
    Narcotic = 2 => "Narcotic",
    Antibiotic = 3 => "Antibiotic",
    Emergency = 4 => "Emergency",
});

chain_enum!(ProposalState, "proposal state", {
    Pending = 0 => "Pending",
    Active = 1 => "Active",
    Defeated = 2 => "Defeated",
    Succeeded = 3 => "Succeeded",
    Executed = 4 => "Executed",
    Cancelled = 5 => "Cancelled",
});

impl AccessLevel {
    /// Whether this level allows reading records.
    #[must_use]
    pub fn can_read(self) -> bool {
        self >= Self::Read
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// A medical record pointer stored on the patient NFT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub ipfs_hash: String,
    pub timestamp: u64,
    pub added_by: Address,
    pub is_active: bool,
}

impl MedicalRecord {
    pub fn from_token(token: Token) -> Result<Self, AbiError> {
        let mut r = TupleReader::new(token)?;
        Ok(Self {
            ipfs_hash: r.string()?,
            timestamp: r.u64()?,
            added_by: r.address()?,
            is_active: r.bool()?,
        })
    }
}

/// A prescription as stored by the prescription contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub id: U256,
    pub patient_token_id: U256,
    pub patient_address: Address,
    pub doctor_address: Address,
    pub pharmacy_address: Address,
    pub medicine_name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub category: MedicineCategory,
    pub ipfs_hash: String,
    pub issued_date: u64,
    pub expiry_date: u64,
    pub status: PrescriptionStatus,
}

impl Prescription {
    pub fn from_token(token: Token) -> Result<Self, AbiError> {
        let mut r = TupleReader::new(token)?;
        Ok(Self {
            id: r.uint()?,
            patient_token_id: r.uint()?,
            patient_address: r.address()?,
            doctor_address: r.address()?,
            pharmacy_address: r.address()?,
            medicine_name: r.string()?,
            dosage: r.string()?,
            frequency: r.string()?,
            duration: r.string()?,
            category: MedicineCategory::from_token(r.next_token()?)?,
            ipfs_hash: r.string()?,
            issued_date: r.u64()?,
            expiry_date: r.u64()?,
            status: PrescriptionStatus::from_token(r.next_token()?)?,
        })
    }

    /// Expiry is strictly before `now` (unix seconds).
    #[must_use]
    pub fn is_expired_at(&self, now: u64) -> bool {
        self.expiry_date < now
    }
}

/// Arguments for `issuePrescription`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPrescription {
    pub patient_token_id: U256,
    pub patient_address: Address,
    pub medicine_name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub category: MedicineCategory,
    pub ipfs_hash: String,
    pub expiry_date: u64,
}

impl NewPrescription {
    pub(crate) fn into_tokens(self) -> Vec<Token> {
        vec![
            self.patient_token_id.into(),
            self.patient_address.into(),
            self.medicine_name.into(),
            self.dosage.into(),
            self.frequency.into(),
            self.duration.into(),
            self.category.into(),
            self.ipfs_hash.into(),
            self.expiry_date.into(),
        ]
    }
}

/// Result of `verifyPrescription`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub is_valid: bool,
    pub message: String,
}

// =============================================================================
// REGISTRIES
// =============================================================================

/// A registered doctor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub doctor_address: Address,
    pub name: String,
    pub specialization: String,
    pub license_number: String,
    pub hospital_affiliation: String,
    pub is_verified: bool,
    pub registration_date: u64,
    #[serde(rename = "metadataURI")]
    pub metadata_uri: String,
}

impl Doctor {
    pub fn from_token(token: Token) -> Result<Self, AbiError> {
        let mut r = TupleReader::new(token)?;
        Ok(Self {
            doctor_address: r.address()?,
            name: r.string()?,
            specialization: r.string()?,
            license_number: r.string()?,
            hospital_affiliation: r.string()?,
            is_verified: r.bool()?,
            registration_date: r.u64()?,
            metadata_uri: r.string()?,
        })
    }
}

/// Arguments for `registerDoctor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorRegistration {
    pub doctor_address: Address,
    pub name: String,
    pub specialization: String,
    pub license_number: String,
    pub hospital_affiliation: String,
    #[serde(rename = "metadataURI")]
    pub metadata_uri: String,
}

impl DoctorRegistration {
    pub(crate) fn into_tokens(self) -> Vec<Token> {
        vec![
            self.doctor_address.into(),
            self.name.into(),
            self.specialization.into(),
            self.license_number.into(),
            self.hospital_affiliation.into(),
            self.metadata_uri.into(),
        ]
    }
}

/// A registered pharmacy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pharmacy {
    pub pharmacy_address: Address,
    pub name: String,
    pub license_number: String,
    pub location: String,
    pub owner: Address,
    pub is_verified: bool,
    pub registration_date: u64,
}

impl Pharmacy {
    pub fn from_token(token: Token) -> Result<Self, AbiError> {
        let mut r = TupleReader::new(token)?;
        Ok(Self {
            pharmacy_address: r.address()?,
            name: r.string()?,
            license_number: r.string()?,
            location: r.string()?,
            owner: r.address()?,
            is_verified: r.bool()?,
            registration_date: r.u64()?,
        })
    }
}

/// Arguments for `registerPharmacy`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PharmacyRegistration {
    pub pharmacy_address: Address,
    pub name: String,
    pub license_number: String,
    pub location: String,
    pub owner: Address,
}

impl PharmacyRegistration {
    pub(crate) fn into_tokens(self) -> Vec<Token> {
        vec![
            self.pharmacy_address.into(),
            self.name.into(),
            self.license_number.into(),
            self.location.into(),
            self.owner.into(),
        ]
    }
}

// =============================================================================
// GOVERNANCE
// =============================================================================

/// A governance proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: U256,
    pub proposer: Address,
    pub description: String,
    pub votes_for: U256,
    pub votes_against: U256,
    pub start_time: u64,
    pub end_time: u64,
    pub executed: bool,
    pub cancelled: bool,
}

impl Proposal {
    pub fn from_token(token: Token) -> Result<Self, AbiError> {
        let mut r = TupleReader::new(token)?;
        Ok(Self {
            id: r.uint()?,
            proposer: r.address()?,
            description: r.string()?,
            votes_for: r.uint()?,
            votes_against: r.uint()?,
            start_time: r.u64()?,
            end_time: r.u64()?,
            executed: r.bool()?,
            cancelled: r.bool()?,
        })
    }
}
