//! # Error Types
//!
//! Errors raised while parsing shared value objects or touching the local store.

use thiserror::Error;

/// Errors produced when parsing value objects from their string forms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// Input was not valid hex or had the wrong length.
    #[error("Invalid {kind}: {input}")]
    InvalidHex {
        /// Which value object was being parsed.
        kind: &'static str,
        /// The rejected input.
        input: String,
    },

    /// Input is not a CIDv0 or base32 CIDv1 string.
    #[error("Invalid CID: {0}")]
    InvalidCid(String),
}

/// Errors from the local key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem access failed.
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a JSON string map.
    #[error("Store file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
