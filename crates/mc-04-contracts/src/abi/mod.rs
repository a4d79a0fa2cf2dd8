//! # ABI Codec
//!
//! Human-readable signature parsing and Solidity ABI encoding.
//!
//! | Piece            | Module        |
//! |------------------|---------------|
//! | Types, params    | [`types`]     |
//! | Values           | [`token`]     |
//! | Head/tail codec  | [`codec`]     |
//! | Functions/events | [`fragment`]  |

pub mod codec;
pub mod errors;
pub mod fragment;
pub mod token;
pub mod types;

pub use codec::{decode, decode_revert_reason, encode, ERROR_STRING_SELECTOR};
pub use errors::AbiError;
pub use fragment::{keccak256, Abi, DecodedLog, Event, Function, StateMutability};
pub use token::{Token, TupleReader};
pub use types::{Param, ParamType};
