//! # QR Payloads
//!
//! JSON documents rendered into QR codes by the dashboards.
//!
//! | `type`                      | Fields                                   |
//! |-----------------------------|------------------------------------------|
//! | `MediChain_Health_Passport` | `tokenId`, `address`, `timestamp` (ms)   |
//! | `MediChain_Prescription`    | `prescriptionId`                         |
//!
//! Token and prescription ids are decimal strings so large ids survive
//! JSON number parsing in other readers.

use crate::screens::ScreenError;
use serde::{Deserialize, Serialize};
use shared_types::{Address, U256};

/// `type` tag of a health passport.
pub const HEALTH_PASSPORT_TYPE: &str = "MediChain_Health_Passport";

/// `type` tag of a prescription code.
pub const PRESCRIPTION_TYPE: &str = "MediChain_Prescription";

/// A patient's shareable identity card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthPassport {
    #[serde(rename = "type")]
    pub kind: String,
    pub token_id: String,
    pub address: Address,
    /// Unix milliseconds at generation.
    pub timestamp: i64,
}

impl HealthPassport {
    #[must_use]
    pub fn new(token_id: U256, address: Address, timestamp: i64) -> Self {
        Self {
            kind: HEALTH_PASSPORT_TYPE.to_string(),
            token_id: token_id.to_string(),
            address,
            timestamp,
        }
    }

    /// Compact JSON encoded into the QR code.
    pub fn to_json(&self) -> Result<String, ScreenError> {
        serde_json::to_string(self).map_err(|e| ScreenError::InvalidQr(e.to_string()))
    }

    /// Parse a scanned passport.
    pub fn parse(text: &str) -> Result<Self, ScreenError> {
        let passport: Self =
            serde_json::from_str(text).map_err(|e| ScreenError::InvalidQr(e.to_string()))?;
        if passport.kind != HEALTH_PASSPORT_TYPE {
            return Err(ScreenError::InvalidQr(format!(
                "expected {HEALTH_PASSPORT_TYPE}, got {}",
                passport.kind
            )));
        }
        Ok(passport)
    }

    /// The token id as a number.
    pub fn token_id(&self) -> Result<U256, ScreenError> {
        parse_id(&self.token_id)
    }
}

/// A prescription handed to the patient and scanned by a pharmacy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionCode {
    #[serde(rename = "type")]
    pub kind: String,
    pub prescription_id: String,
}

impl PrescriptionCode {
    #[must_use]
    pub fn new(id: U256) -> Self {
        Self {
            kind: PRESCRIPTION_TYPE.to_string(),
            prescription_id: id.to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String, ScreenError> {
        serde_json::to_string(self).map_err(|e| ScreenError::InvalidQr(e.to_string()))
    }

    /// Parse a scanned code and return the prescription id.
    ///
    /// A bare decimal id is accepted too, matching manual entry.
    pub fn scan(text: &str) -> Result<U256, ScreenError> {
        let text = text.trim();
        if !text.starts_with('{') {
            return parse_id(text);
        }
        let code: ScannedPrescription =
            serde_json::from_str(text).map_err(|e| ScreenError::InvalidQr(e.to_string()))?;
        if code.kind != PRESCRIPTION_TYPE {
            return Err(ScreenError::InvalidQr(format!(
                "expected {PRESCRIPTION_TYPE}, got {}",
                code.kind
            )));
        }
        match code.prescription_id {
            ScannedId::Text(id) => parse_id(&id),
            ScannedId::Number(id) => parse_id(&id.to_string()),
        }
    }
}

/// Scanned form of [`PrescriptionCode`]; other generators emit the id as a
/// JSON number.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScannedPrescription {
    #[serde(rename = "type")]
    kind: String,
    prescription_id: ScannedId,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScannedId {
    Text(String),
    Number(serde_json::Number),
}

/// Parse a decimal id.
pub fn parse_id(text: &str) -> Result<U256, ScreenError> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ScreenError::InvalidQr(format!("not an id: {text:?}")));
    }
    U256::from_dec_str(text).map_err(|e| ScreenError::InvalidQr(e.to_string()))
}
