//! # Content Identifiers
//!
//! A [`Cid`] is the handle a pinning service returns for an uploaded blob.
//! Two textual forms are accepted:
//!
//! | Form   | Shape                                   |
//! |--------|-----------------------------------------|
//! | CIDv0  | `Qm` followed by 44 base58btc chars     |
//! | CIDv1  | `b` followed by 58 base32 chars          |
//!
//! Values are immutable once issued.

use crate::errors::TypeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Multicodec for raw binary content.
const CODEC_RAW: u8 = 0x55;
/// Multihash code for sha2-256.
const MULTIHASH_SHA256: u8 = 0x12;

/// A validated content identifier.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cid(String);

impl Cid {
    /// Parse and validate a CID string.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if Self::is_valid(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(TypeError::InvalidCid(s.to_string()))
        }
    }

    /// Check the textual shape of a CID without allocating.
    #[must_use]
    pub fn is_valid(s: &str) -> bool {
        if let Some(rest) = s.strip_prefix("Qm") {
            return rest.len() == 44 && rest.chars().all(|c| BASE58_ALPHABET.contains(c));
        }
        if let Some(rest) = s.strip_prefix('b') {
            return rest.len() == 58
                && rest
                    .chars()
                    .all(|c| c.is_ascii_alphabetic() || ('2'..='7').contains(&c));
        }
        false
    }

    /// Compute the CIDv1 (raw codec, sha2-256) for a blob.
    #[must_use]
    pub fn from_content(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        let mut bytes = Vec::with_capacity(36);
        bytes.extend_from_slice(&[0x01, CODEC_RAW, MULTIHASH_SHA256, 32]);
        bytes.extend_from_slice(&digest);
        let encoded = base32::encode(base32::Alphabet::Rfc4648 { padding: false }, &bytes);
        Self(format!("b{}", encoded.to_lowercase()))
    }

    /// The string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Cid {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cid({})", self.0)
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Cid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Cid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Cid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
