//! # Shared Types Crate
//!
//! Value objects shared by every MediChain crate.
//!
//! ## Contents
//!
//! - **Primitives**: [`Address`], [`TxHash`], re-exported [`U256`].
//! - **Content addressing**: [`Cid`], validated on construction.
//! - **Local storage**: the [`LocalStore`] trait with in-memory and
//!   file-backed implementations.
//!
//! ## Design Principles
//!
//! - **Parse, don't validate**: a value that exists is well-formed.
//! - **String wire forms**: every value serializes as the same string a
//!   wallet or gateway would show, so JSON payloads stay interoperable.

pub mod cid;
pub mod errors;
pub mod primitives;
pub mod store;

pub use cid::Cid;
pub use errors::*;
pub use primitives::{Address, TxHash, U256};
pub use store::{FileStore, LocalStore, MemoryStore};
