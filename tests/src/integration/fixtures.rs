//! # Test World
//!
//! One simulated chain and one IPFS network shared by any number of parties.

use std::sync::Arc;

use mc_01_wallet::{LocalKeyring, LocalWallet, WalletSession};
use mc_03_ipfs::{ContentSource, InMemoryIpfs, IpfsClient, PinningService};
use mc_04_contracts::{Abi, ContractAddresses, ContractName, ContractRegistry, MockChain, Token};
use medichain_runtime::{AppConfig, AppContainer};
use shared_types::{Address, MemoryStore};

/// Contract addresses used by every world.
pub fn address_of(name: ContractName) -> Address {
    let byte = match name {
        ContractName::PatientNft => 0xc1,
        ContractName::PrescriptionContract => 0xc2,
        ContractName::DoctorRegistry => 0xc3,
        ContractName::PharmacyRegistry => 0xc4,
        ContractName::Governance => 0xc5,
    };
    Address::new([byte; 20])
}

pub struct World {
    pub chain: MockChain,
    /// Pinning services in upload order.
    pub pinners: Vec<Arc<InMemoryIpfs>>,
    /// Where downloads are read from.
    pub network: Arc<InMemoryIpfs>,
    config: AppConfig,
    registry: ContractRegistry,
}

/// A device: its own wallet, local store and container.
pub struct Party {
    pub keyring: Arc<LocalKeyring>,
    pub app: Arc<AppContainer>,
}

impl Party {
    pub async fn connect(&self) -> WalletSession {
        self.app.wallet().connect().await.unwrap()
    }
}

impl World {
    /// A world with one configured pinning service.
    pub fn new() -> Self {
        let ipfs = Arc::new(InMemoryIpfs::new());
        Self::with_pinners(vec![Arc::clone(&ipfs)], ipfs)
    }

    pub fn with_pinners(pinners: Vec<Arc<InMemoryIpfs>>, network: Arc<InMemoryIpfs>) -> Self {
        let mut config = AppConfig::default();
        let mut addresses = ContractAddresses::default();
        for name in ContractName::ALL {
            addresses.set(name, Some(address_of(name)));
        }
        config.contracts = addresses.clone();
        Self {
            chain: MockChain::new(config.chain_id),
            pinners,
            network,
            registry: ContractRegistry::new(addresses).unwrap(),
            config,
        }
    }

    /// A new device holding the key derived from `seed`.
    pub fn party(&self, seed: u8) -> Party {
        let keyring = Arc::new(LocalKeyring::new(
            vec![LocalWallet::from_bytes(&[seed; 32]).unwrap()],
            self.config.chain_id,
        ));
        let ipfs = IpfsClient::new(
            self.pinners
                .iter()
                .map(|p| Arc::clone(p) as Arc<dyn PinningService>)
                .collect(),
            vec![Arc::clone(&self.network) as Arc<dyn ContentSource>],
        );
        let app = AppContainer::with_parts(
            self.config.clone(),
            self.chain.transport(),
            keyring.clone(),
            Arc::new(MemoryStore::new()),
            ipfs,
        )
        .unwrap();
        Party {
            keyring,
            app: Arc::new(app),
        }
    }

    pub fn abi(&self, name: ContractName) -> Arc<Abi> {
        self.registry.abi(name).unwrap()
    }

    pub fn answer(&self, name: ContractName, method: &str, outputs: Vec<Token>) {
        self.chain
            .answer(address_of(name), &self.abi(name), method, outputs)
            .unwrap();
    }

    pub fn emit(&self, name: ContractName, method: &str, event: &str, args: Vec<Token>) {
        self.chain
            .emit(address_of(name), &self.abi(name), method, event, args)
            .unwrap();
    }

    pub fn revert(&self, name: ContractName, method: &str, reason: &str) {
        self.chain
            .revert(address_of(name), &self.abi(name), method, reason)
            .unwrap();
    }

    pub fn sent(&self, name: ContractName, method: &str) -> usize {
        self.chain
            .sent_count(address_of(name), &self.abi(name), method)
            .unwrap()
    }
}

/// `getMedicalRecords` tuple.
pub fn record(cid: &str, added_by: Address) -> Token {
    Token::Tuple(vec![
        cid.into(),
        Token::from(1_700_000_000u64),
        added_by.into(),
        Token::Bool(true),
    ])
}
