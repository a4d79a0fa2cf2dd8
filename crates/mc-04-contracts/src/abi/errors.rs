//! ABI error types.

use thiserror::Error;

/// Errors from parsing signatures or encoding/decoding ABI data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// A human-readable signature could not be parsed.
    #[error("Invalid signature `{0}`")]
    InvalidSignature(String),

    /// A type name is not a Solidity ABI type.
    #[error("Unknown type `{0}`")]
    UnknownType(String),

    /// The ABI has no function with this name.
    #[error("Unknown function `{0}`")]
    UnknownFunction(String),

    /// The ABI has no event with this name.
    #[error("Unknown event `{0}`")]
    UnknownEvent(String),

    /// Wrong number of call arguments.
    #[error("{function} expects {expected} arguments, got {actual}")]
    ArgumentCount {
        function: String,
        expected: usize,
        actual: usize,
    },

    /// A call argument does not fit its declared type.
    #[error("Argument {index} of {function} does not match `{expected}`")]
    ArgumentType {
        function: String,
        index: usize,
        expected: String,
    },

    /// Encoded data ends before a required word.
    #[error("Data too short: need {needed} bytes at offset {offset}, have {len}")]
    ShortData {
        offset: usize,
        needed: usize,
        len: usize,
    },

    /// Encoded data is structurally invalid.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A log's topics do not belong to the expected event.
    #[error("Log does not match event {0}")]
    EventMismatch(String),

    /// A decoded value had a different shape than the caller expected.
    #[error("Expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },

    /// An on-chain enum held a value outside its range.
    #[error("Invalid {kind} value {value}")]
    InvalidEnum { kind: &'static str, value: u64 },
}
