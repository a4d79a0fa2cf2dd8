//! # Adapters Layer
//!
//! Local implementations of the wallet ports, backed by in-process keys.

pub mod keyring;
pub mod local_wallet;

pub use keyring::LocalKeyring;
pub use local_wallet::LocalWallet;
