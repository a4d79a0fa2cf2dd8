//! # IPFS Subsystem (MC-03)
//!
//! Pins encrypted envelopes and prescription metadata, and fetches them back
//! by CID.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): [`IpfsConfig`], [`UploadResponse`], [`IpfsError`]
//! - **Ports Layer** (`ports/`): [`PinningService`] and [`ContentSource`]
//! - **Adapters Layer** (`adapters/`): web3.storage, Pinata, HTTP gateways,
//!   and an in-memory store
//! - **Service Layer** (`service.rs`): the fall-through [`IpfsClient`]
//!
//! ## Providers
//!
//! | Provider     | Auth                           | Gateway                       |
//! |--------------|--------------------------------|-------------------------------|
//! | web3.storage | bearer token                   | `https://w3s.link`            |
//! | Pinata       | `pinata_api_key` + secret      | `https://gateway.pinata.cloud`|

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::{HttpGateway, InMemoryIpfs, PinataService, Web3StorageService};
pub use domain::config::{IpfsConfig, DEFAULT_GATEWAYS, FALLBACK_GATEWAY};
pub use domain::errors::IpfsError;
pub use domain::types::{gateway_link, UploadResponse, APPLICATION_JSON, OCTET_STREAM};
pub use ports::outbound::{ContentSource, PinningService};
pub use service::IpfsClient;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
