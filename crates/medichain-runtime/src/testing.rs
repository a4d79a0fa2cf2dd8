//! Container over a mock chain, in-memory IPFS and a memory store.

use crate::config::AppConfig;
use crate::container::AppContainer;
use mc_01_wallet::{LocalKeyring, LocalWallet, WalletSession};
use mc_03_ipfs::{ContentSource, InMemoryIpfs, IpfsClient, PinningService};
use mc_04_contracts::{Abi, ContractName, MockChain, Token};
use shared_types::{Address, MemoryStore};
use std::sync::Arc;

pub const PATIENT_NFT: Address = Address::new([0xa1; 20]);
pub const PRESCRIPTIONS: Address = Address::new([0xa2; 20]);
pub const DOCTORS: Address = Address::new([0xa3; 20]);
pub const PHARMACIES: Address = Address::new([0xa4; 20]);
pub const GOVERNANCE: Address = Address::new([0xa5; 20]);

pub struct Harness {
    pub chain: MockChain,
    pub ipfs: Arc<InMemoryIpfs>,
    pub keyring: Arc<LocalKeyring>,
    pub container: Arc<AppContainer>,
}

pub fn address_of(name: ContractName) -> Address {
    match name {
        ContractName::PatientNft => PATIENT_NFT,
        ContractName::PrescriptionContract => PRESCRIPTIONS,
        ContractName::DoctorRegistry => DOCTORS,
        ContractName::PharmacyRegistry => PHARMACIES,
        ContractName::Governance => GOVERNANCE,
    }
}

impl Harness {
    /// One account derived from `seed`.
    pub fn new(seed: u8) -> Self {
        let mut config = AppConfig::default();
        for name in ContractName::ALL {
            config.contracts.set(name, Some(address_of(name)));
        }
        let chain = MockChain::new(config.chain_id);
        let ipfs = Arc::new(InMemoryIpfs::new());
        let keyring = Arc::new(LocalKeyring::new(
            vec![LocalWallet::from_bytes(&[seed; 32]).unwrap()],
            config.chain_id,
        ));
        let container = AppContainer::with_parts(
            config,
            chain.transport(),
            keyring.clone(),
            Arc::new(MemoryStore::new()),
            IpfsClient::new(
                vec![ipfs.clone() as Arc<dyn PinningService>],
                vec![ipfs.clone() as Arc<dyn ContentSource>],
            ),
        )
        .unwrap();
        Self {
            chain,
            ipfs,
            keyring,
            container: Arc::new(container),
        }
    }

    pub fn abi(&self, name: ContractName) -> Arc<Abi> {
        self.container.contracts().abi(name).unwrap()
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

    pub fn sent(&self, name: ContractName, method: &str) -> usize {
        self.chain
            .sent_count(address_of(name), &self.abi(name), method)
            .unwrap()
    }

    pub async fn connect(&self) -> WalletSession {
        self.container.wallet().connect().await.unwrap()
    }
}
