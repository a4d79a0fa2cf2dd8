//! # Contract Access Subsystem (MC-04)
//!
//! Reads and writes the five pre-deployed MediChain contracts over JSON-RPC.
//!
//! ## Architecture
//!
//! - **ABI** (`abi/`): signature parser and Solidity head/tail codec
//! - **Domain Layer** (`domain/`): RPC shapes, decoded entities, [`ContractError`]
//! - **Ports Layer** (`ports/`): [`RpcTransport`]
//! - **Adapters Layer** (`adapters/`): [`HttpTransport`], [`ScriptedTransport`]
//!   and the contract-aware [`MockChain`]
//! - **Handles** (`contract.rs`, `registry.rs`): [`ContractHandle`], [`ContractRegistry`]
//! - **Facades** (`facades/`): one typed wrapper per contract
//!
//! ## Contracts
//!
//! | Name                   | Facade               | Id-bearing event       |
//! |------------------------|----------------------|------------------------|
//! | `patientNFT`           | [`PatientNft`]       | `PatientNFTMinted`     |
//! | `prescriptionContract` | [`Prescriptions`]    | `PrescriptionIssued`   |
//! | `doctorRegistry`       | [`DoctorRegistry`]   | -                      |
//! | `pharmacyRegistry`     | [`PharmacyRegistry`] | -                      |
//! | `governance`           | [`Governance`]       | `ProposalCreated`      |
//!
//! ## Gas
//!
//! Every write is sent with the node's estimate plus 20% ([`with_gas_buffer`]).

pub mod abi;
pub mod abis;
pub mod adapters;
pub mod contract;
pub mod domain;
pub mod facades;
pub mod ports;
pub mod provider;
pub mod registry;

// Re-export public API
pub use abi::{Abi, AbiError, DecodedLog, Token};
pub use abis::ContractName;
pub use adapters::{HttpTransport, MockChain, ScriptedTransport};
pub use contract::{
    with_gas_buffer, ContractHandle, PendingTransaction, DEFAULT_CONFIRMATION_TIMEOUT,
    DEFAULT_POLL_INTERVAL,
};
pub use domain::entities::{
    AccessLevel, Doctor, DoctorRegistration, MedicalRecord, MedicineCategory, NewPrescription,
    Pharmacy, PharmacyRegistration, Prescription, PrescriptionStatus, Proposal, ProposalState,
    Verification,
};
pub use domain::errors::{classify_rpc, format_error, ContractError, RpcError};
pub use domain::rpc::{CallRequest, Log, TransactionReceipt};
pub use facades::{DoctorRegistry, Governance, PatientNft, PharmacyRegistry, Prescriptions};
pub use ports::outbound::RpcTransport;
pub use provider::Provider;
pub use registry::{ContractAddresses, ContractRegistry};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
