//! # Application Configuration
//!
//! Everything the runtime needs, read once from the environment at startup.
//! There is no hot reload: a changed variable takes effect on the next run.
//!
//! ## Environment Variables
//!
//! | Variable                                   | Default                    |
//! |--------------------------------------------|----------------------------|
//! | `MEDICHAIN_CHAIN_ID`                       | `80001`                    |
//! | `MEDICHAIN_RPC_URL`                        | known network's RPC URL    |
//! | `MEDICHAIN_PATIENT_NFT_ADDRESS`            | -                          |
//! | `MEDICHAIN_PRESCRIPTION_CONTRACT_ADDRESS`  | -                          |
//! | `MEDICHAIN_DOCTOR_REGISTRY_ADDRESS`        | -                          |
//! | `MEDICHAIN_PHARMACY_REGISTRY_ADDRESS`      | -                          |
//! | `MEDICHAIN_GOVERNANCE_ADDRESS`             | -                          |
//! | `MEDICHAIN_WEB3_STORAGE_TOKEN`             | -                          |
//! | `MEDICHAIN_PINATA_API_KEY`                 | -                          |
//! | `MEDICHAIN_PINATA_SECRET_KEY`              | -                          |
//! | `MEDICHAIN_BACKEND_URL`                    | `http://localhost:5000`    |
//! | `MEDICHAIN_DATA_DIR`                       | `./.medichain`             |
//! | `MEDICHAIN_PRIVATE_KEY`                    | -                          |
//!
//! Logging variables are read by [`TelemetryConfig::from_lookup`].

use mc_01_wallet::{find_network, DEFAULT_CHAIN_ID};
use mc_03_ipfs::IpfsConfig;
use mc_04_contracts::{ContractAddresses, ContractName};
use mc_05_backend_client::DEFAULT_BACKEND_URL;
use mc_telemetry::TelemetryConfig;
use shared_types::Address;
use std::env;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Default location of the local key-value store.
pub const DEFAULT_DATA_DIR: &str = "./.medichain";

/// File inside the data directory that backs the local store.
pub const STORE_FILE: &str = "store.json";

/// Configuration errors. Each names the offending variable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable that must be an integer was not.
    #[error("{var} must be an integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    /// A variable that must be an address was not.
    #[error("{var} is not a valid address: {value:?}")]
    InvalidAddress { var: &'static str, value: String },

    /// No RPC URL was given and the chain is not a known network.
    #[error("MEDICHAIN_RPC_URL is required for unknown chain {0}")]
    MissingRpcUrl(u64),
}

/// Complete runtime configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// Chain the dashboards expect the wallet to be on.
    pub chain_id: u64,
    /// JSON-RPC endpoint for reads and transaction submission.
    pub rpc_url: String,
    /// Deployed contract addresses.
    pub contracts: ContractAddresses,
    /// Pinning credentials and gateways.
    pub ipfs: IpfsConfig,
    /// Base URL of the peer-review backend.
    pub backend_url: String,
    /// Directory holding the local store.
    pub data_dir: PathBuf,
    /// Hex secp256k1 key backing the local wallet.
    pub private_key: Option<String>,
    /// Logging.
    pub telemetry: TelemetryConfig,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("chain_id", &self.chain_id)
            .field("rpc_url", &self.rpc_url)
            .field("contracts", &self.contracts)
            .field("ipfs", &self.ipfs)
            .field("backend_url", &self.backend_url)
            .field("data_dir", &self.data_dir)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let rpc_url = find_network(DEFAULT_CHAIN_ID)
            .map(|n| n.rpc_url.to_string())
            .unwrap_or_default();
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            rpc_url,
            contracts: ContractAddresses::default(),
            ipfs: IpfsConfig::default(),
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            private_key: None,
            telemetry: TelemetryConfig::default(),
        }
    }
}

// =============================================================================
// ENVIRONMENT
// =============================================================================

const ADDRESS_VARS: [(&str, ContractName); 5] = [
    ("MEDICHAIN_PATIENT_NFT_ADDRESS", ContractName::PatientNft),
    (
        "MEDICHAIN_PRESCRIPTION_CONTRACT_ADDRESS",
        ContractName::PrescriptionContract,
    ),
    ("MEDICHAIN_DOCTOR_REGISTRY_ADDRESS", ContractName::DoctorRegistry),
    (
        "MEDICHAIN_PHARMACY_REGISTRY_ADDRESS",
        ContractName::PharmacyRegistry,
    ),
    ("MEDICHAIN_GOVERNANCE_ADDRESS", ContractName::Governance),
];

/// Present and not blank.
fn non_empty<F>(lookup: &F, var: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AppConfig {
    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let chain_id = match non_empty(&lookup, "MEDICHAIN_CHAIN_ID") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
                var: "MEDICHAIN_CHAIN_ID",
                value,
            })?,
            None => defaults.chain_id,
        };

        let rpc_url = match non_empty(&lookup, "MEDICHAIN_RPC_URL") {
            Some(url) => url,
            None => find_network(chain_id)
                .map(|n| n.rpc_url.to_string())
                .ok_or(ConfigError::MissingRpcUrl(chain_id))?,
        };

        let mut contracts = ContractAddresses::default();
        for (var, name) in ADDRESS_VARS {
            if let Some(value) = non_empty(&lookup, var) {
                let address = value
                    .parse::<Address>()
                    .map_err(|_| ConfigError::InvalidAddress { var, value })?;
                contracts.set(name, Some(address));
            }
        }

        let ipfs = IpfsConfig {
            web3_storage_token: non_empty(&lookup, "MEDICHAIN_WEB3_STORAGE_TOKEN"),
            pinata_api_key: non_empty(&lookup, "MEDICHAIN_PINATA_API_KEY"),
            pinata_secret_key: non_empty(&lookup, "MEDICHAIN_PINATA_SECRET_KEY"),
            ..defaults.ipfs
        };

        Ok(Self {
            chain_id,
            rpc_url,
            contracts,
            ipfs,
            backend_url: non_empty(&lookup, "MEDICHAIN_BACKEND_URL")
                .unwrap_or(defaults.backend_url),
            data_dir: non_empty(&lookup, "MEDICHAIN_DATA_DIR")
                .map_or(defaults.data_dir, PathBuf::from),
            private_key: non_empty(&lookup, "MEDICHAIN_PRIVATE_KEY"),
            telemetry: TelemetryConfig::from_lookup(&lookup),
        })
    }

    /// Path of the file-backed local store.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.chain_id, 80001);
        assert_eq!(config.rpc_url, "https://rpc-mumbai.maticvigil.com");
        assert_eq!(config.backend_url, "http://localhost:5000");
        assert_eq!(config.data_dir, PathBuf::from("./.medichain"));
        assert_eq!(config.contracts.missing().len(), 5);
        assert!(!config.ipfs.has_provider());
        assert!(config.private_key.is_none());
    }

    #[test]
    fn test_reads_addresses_and_credentials() {
        let patient = format!("0x{}", "11".repeat(20));
        let config = AppConfig::from_lookup(lookup(&[
            ("MEDICHAIN_PATIENT_NFT_ADDRESS", patient.as_str()),
            ("MEDICHAIN_PINATA_API_KEY", "key"),
            ("MEDICHAIN_PINATA_SECRET_KEY", "secret"),
            ("MEDICHAIN_BACKEND_URL", "http://review.local"),
        ]))
        .unwrap();
        assert_eq!(config.contracts.patient_nft, Some(Address::new([0x11; 20])));
        assert_eq!(config.contracts.missing().len(), 4);
        assert!(config.ipfs.has_provider());
        assert_eq!(config.backend_url, "http://review.local");
    }

    #[test]
    fn test_known_chain_picks_rpc() {
        let config = AppConfig::from_lookup(lookup(&[("MEDICHAIN_CHAIN_ID", "137")])).unwrap();
        assert_eq!(config.chain_id, 137);
        assert!(config.rpc_url.contains("polygon"));
    }

    #[test]
    fn test_unknown_chain_needs_rpc_url() {
        assert_eq!(
            AppConfig::from_lookup(lookup(&[("MEDICHAIN_CHAIN_ID", "999")])).unwrap_err(),
            ConfigError::MissingRpcUrl(999)
        );
        let config = AppConfig::from_lookup(lookup(&[
            ("MEDICHAIN_CHAIN_ID", "999"),
            ("MEDICHAIN_RPC_URL", "http://127.0.0.1:8545"),
        ]))
        .unwrap();
        assert_eq!(config.rpc_url, "http://127.0.0.1:8545");
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = AppConfig::from_lookup(lookup(&[("MEDICHAIN_CHAIN_ID", "mumbai")])).unwrap_err();
        assert!(err.to_string().starts_with("MEDICHAIN_CHAIN_ID"));

        let err = AppConfig::from_lookup(lookup(&[("MEDICHAIN_GOVERNANCE_ADDRESS", "0x1234")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidAddress { var: "MEDICHAIN_GOVERNANCE_ADDRESS", .. }
        ));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[
            ("MEDICHAIN_CHAIN_ID", "  "),
            ("MEDICHAIN_PRIVATE_KEY", ""),
        ]))
        .unwrap();
        assert_eq!(config.chain_id, 80001);
        assert!(config.private_key.is_none());
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let config = AppConfig::from_lookup(lookup(&[("MEDICHAIN_PRIVATE_KEY", "0xdeadbeef")]))
            .unwrap();
        let shown = format!("{config:?}");
        assert!(!shown.contains("deadbeef"));
        assert!(shown.contains("<redacted>"));
    }
}
