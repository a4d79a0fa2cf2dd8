//! # Known Networks
//!
//! | Chain id  | Name            | Currency |
//! |-----------|-----------------|----------|
//! | 80001     | Polygon Mumbai  | MATIC    |
//! | 137       | Polygon Mainnet | MATIC    |
//! | 11155111  | Sepolia         | ETH      |
//! | 31337     | Localhost       | ETH      |

use serde::Serialize;

/// Default chain the dashboards expect.
pub const DEFAULT_CHAIN_ID: u64 = 80001;

/// Native currency metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NativeCurrency {
    /// Display name.
    pub name: &'static str,
    /// Ticker.
    pub symbol: &'static str,
    /// Decimal places.
    pub decimals: u8,
}

/// Static description of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkInfo {
    /// EIP-155 chain id.
    pub chain_id: u64,
    /// Human-readable name.
    pub name: &'static str,
    /// Public RPC endpoint.
    pub rpc_url: &'static str,
    /// Block explorer base URL; empty when there is none.
    pub explorer_url: &'static str,
    /// Native currency.
    pub currency: NativeCurrency,
}

const MATIC: NativeCurrency = NativeCurrency {
    name: "MATIC",
    symbol: "MATIC",
    decimals: 18,
};

const ETH: NativeCurrency = NativeCurrency {
    name: "ETH",
    symbol: "ETH",
    decimals: 18,
};

/// Every chain the wallet can switch to.
pub const KNOWN_NETWORKS: [NetworkInfo; 4] = [
    NetworkInfo {
        chain_id: 80001,
        name: "Polygon Mumbai",
        rpc_url: "https://rpc-mumbai.maticvigil.com",
        explorer_url: "https://mumbai.polygonscan.com",
        currency: MATIC,
    },
    NetworkInfo {
        chain_id: 137,
        name: "Polygon Mainnet",
        rpc_url: "https://polygon-rpc.com",
        explorer_url: "https://polygonscan.com",
        currency: MATIC,
    },
    NetworkInfo {
        chain_id: 11155111,
        name: "Sepolia",
        rpc_url: "https://rpc.sepolia.org",
        explorer_url: "https://sepolia.etherscan.io",
        currency: ETH,
    },
    NetworkInfo {
        chain_id: 31337,
        name: "Localhost",
        rpc_url: "http://127.0.0.1:8545",
        explorer_url: "",
        currency: ETH,
    },
];

/// Look up a chain by id.
#[must_use]
pub fn find_network(chain_id: u64) -> Option<&'static NetworkInfo> {
    KNOWN_NETWORKS.iter().find(|n| n.chain_id == chain_id)
}

/// Display name for a chain, falling back to `"Unknown Network"`.
#[must_use]
pub fn network_name(chain_id: u64) -> &'static str {
    find_network(chain_id).map_or("Unknown Network", |n| n.name)
}

/// Explorer link for a transaction; empty when the chain has no explorer.
#[must_use]
pub fn explorer_tx_url(chain_id: u64, tx_hash: &str) -> String {
    match find_network(chain_id) {
        Some(n) if !n.explorer_url.is_empty() => format!("{}/tx/{}", n.explorer_url, tx_hash),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_known() {
        assert_eq!(find_network(137).unwrap().name, "Polygon Mainnet");
        assert_eq!(find_network(DEFAULT_CHAIN_ID).unwrap().currency.symbol, "MATIC");
        assert!(find_network(1).is_none());
    }

    #[test]
    fn test_network_name_fallback() {
        assert_eq!(network_name(31337), "Localhost");
        assert_eq!(network_name(42), "Unknown Network");
    }

    #[test]
    fn test_explorer_url() {
        assert_eq!(
            explorer_tx_url(80001, "0xabc"),
            "https://mumbai.polygonscan.com/tx/0xabc"
        );
        assert_eq!(explorer_tx_url(31337, "0xabc"), "");
        assert_eq!(explorer_tx_url(999, "0xabc"), "");
    }
}
