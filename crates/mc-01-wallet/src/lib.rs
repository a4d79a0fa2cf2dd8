//! # Wallet Subsystem (MC-01)
//!
//! Holds the connected account, its chain, and the capability to sign as it.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): signatures, legacy transactions, sessions,
//!   the known-network table, unit conversion
//! - **Ports Layer** (`ports/`): [`Signer`] and [`WalletBackend`]
//! - **Adapters Layer** (`adapters/`): in-process [`LocalWallet`] and
//!   [`LocalKeyring`]
//! - **Service Layer** (`service.rs`): the [`WalletStore`] session context
//!
//! ## Error Mapping
//!
//! | Condition                        | Error                            |
//! |----------------------------------|----------------------------------|
//! | User declines a prompt           | [`WalletError::UserRejected`]    |
//! | No session                       | [`WalletError::WalletNotConnected`] |
//! | Chain unknown to the wallet      | [`WalletError::UnknownNetwork`]  |
//! | Session on the wrong chain       | [`WalletError::NetworkMismatch`] |

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::{LocalKeyring, LocalWallet};
pub use domain::errors::WalletError;
pub use domain::networks::{
    explorer_tx_url, find_network, network_name, NetworkInfo, DEFAULT_CHAIN_ID, KNOWN_NETWORKS,
};
pub use domain::session::{ProviderEvent, WalletSession, CONNECTED_FLAG_KEY};
pub use domain::signature::{hash_message, Signature};
pub use domain::transaction::{raw_transaction_hash, TransactionRequest};
pub use domain::units::{format_ether, parse_ether};
pub use ports::outbound::{Signer, WalletBackend};
pub use service::WalletStore;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
