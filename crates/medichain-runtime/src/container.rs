//! # Application Container
//!
//! Builds every subsystem once from [`AppConfig`] and hands out shared
//! references. Screens take the container instead of reaching for globals.
//!
//! ## Wiring
//!
//! ```text
//!   AppConfig ──► Provider(HttpTransport)
//!             ├─► WalletStore(LocalKeyring, FileStore, InMemoryEventBus)
//!             ├─► ContractRegistry ──bind(session signer)──► facades
//!             ├─► IpfsClient(web3.storage → Pinata, gateways)
//!             ├─► MetadataStore(FileStore)
//!             └─► BackendClient(FileStore)
//! ```
//!
//! Contract facades are bound on demand so writes always sign as the
//! account of the current session.

use crate::config::AppConfig;
use mc_01_wallet::{LocalKeyring, LocalWallet, Signer, WalletBackend, WalletError, WalletStore};
use mc_02_encryption::{EncryptionError, Encryptor, MetadataStore};
use mc_03_ipfs::{IpfsClient, IpfsError};
use mc_04_contracts::{
    AbiError, ContractError, ContractName, ContractRegistry, DoctorRegistry, Governance,
    HttpTransport, PatientNft, PharmacyRegistry, Prescriptions, Provider, RpcError, RpcTransport,
};
use mc_05_backend_client::{BackendClient, BackendError};
use shared_bus::InMemoryEventBus;
use shared_types::{FileStore, LocalStore, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors raised while wiring the container.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("Local store: {0}")]
    Store(#[from] StoreError),

    #[error("RPC transport: {0}")]
    Rpc(#[from] RpcError),

    #[error("Contract ABI: {0}")]
    Abi(#[from] AbiError),

    #[error("IPFS client: {0}")]
    Ipfs(#[from] IpfsError),

    #[error("Backend client: {0}")]
    Backend(#[from] BackendError),

    #[error("Wallet: {0}")]
    Wallet(#[from] WalletError),
}

/// Shared handles to every subsystem.
pub struct AppContainer {
    config: AppConfig,
    provider: Provider,
    wallet: Arc<WalletStore>,
    contracts: ContractRegistry,
    ipfs: IpfsClient,
    metadata: MetadataStore,
    backend: Arc<BackendClient>,
    store: Arc<dyn LocalStore>,
}

impl AppContainer {
    /// Wire the production adapters described by `config`.
    pub fn from_config(config: AppConfig) -> Result<Self, ContainerError> {
        let store: Arc<dyn LocalStore> = Arc::new(FileStore::open(config.store_path())?);
        let transport: Arc<dyn RpcTransport> =
            Arc::new(HttpTransport::new(config.rpc_url.clone())?);

        let wallets = match &config.private_key {
            Some(key) => vec![LocalWallet::from_hex(key)?],
            None => Vec::new(),
        };
        let keyring: Arc<dyn WalletBackend> = Arc::new(LocalKeyring::new(wallets, config.chain_id));
        let ipfs = IpfsClient::from_config(&config.ipfs)?;

        let container = Self::with_parts(config, transport, keyring, store, ipfs)?;
        info!(
            chain_id = container.config.chain_id,
            rpc = %container.config.rpc_url,
            ipfs_configured = container.ipfs.is_configured(),
            "Container wired"
        );
        Ok(container)
    }

    /// Wire around caller-supplied adapters.
    pub fn with_parts(
        config: AppConfig,
        transport: Arc<dyn RpcTransport>,
        wallet_backend: Arc<dyn WalletBackend>,
        store: Arc<dyn LocalStore>,
        ipfs: IpfsClient,
    ) -> Result<Self, ContainerError> {
        let bus = Arc::new(InMemoryEventBus::new());
        let wallet = Arc::new(WalletStore::new(wallet_backend, Arc::clone(&store), bus));
        let contracts = ContractRegistry::new(config.contracts.clone())?;
        let backend =
            BackendClient::new(config.backend_url.clone())?.with_store(Arc::clone(&store))?;

        Ok(Self {
            provider: Provider::new(transport),
            wallet,
            contracts,
            ipfs,
            metadata: MetadataStore::new(Arc::clone(&store)),
            backend: Arc::new(backend),
            store,
            config,
        })
    }

    // =========================================================================
    // SUBSYSTEMS
    // =========================================================================

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    /// The session context.
    #[must_use]
    pub fn wallet(&self) -> Arc<WalletStore> {
        Arc::clone(&self.wallet)
    }

    #[must_use]
    pub fn contracts(&self) -> &ContractRegistry {
        &self.contracts
    }

    #[must_use]
    pub fn ipfs(&self) -> &IpfsClient {
        &self.ipfs
    }

    #[must_use]
    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }

    #[must_use]
    pub fn backend(&self) -> Arc<BackendClient> {
        Arc::clone(&self.backend)
    }

    #[must_use]
    pub fn store(&self) -> Arc<dyn LocalStore> {
        Arc::clone(&self.store)
    }

    // =========================================================================
    // SESSION-BOUND HANDLES
    // =========================================================================

    /// Signer of the current session, if any.
    #[must_use]
    pub fn signer(&self) -> Option<Arc<dyn Signer>> {
        self.wallet.session().map(|s| s.signer)
    }

    /// Encryptor for the current session.
    pub fn encryptor(&self) -> Result<Encryptor, EncryptionError> {
        Encryptor::for_session(self.wallet.session().as_ref())
    }

    fn bind(&self, name: ContractName) -> Result<mc_04_contracts::ContractHandle, ContractError> {
        self.contracts.bind(name, &self.provider, self.signer())
    }

    pub fn patient_nft(&self) -> Result<PatientNft, ContractError> {
        self.bind(ContractName::PatientNft).map(PatientNft::new)
    }

    pub fn prescriptions(&self) -> Result<Prescriptions, ContractError> {
        self.bind(ContractName::PrescriptionContract)
            .map(Prescriptions::new)
    }

    pub fn doctor_registry(&self) -> Result<DoctorRegistry, ContractError> {
        self.bind(ContractName::DoctorRegistry).map(DoctorRegistry::new)
    }

    pub fn pharmacy_registry(&self) -> Result<PharmacyRegistry, ContractError> {
        self.bind(ContractName::PharmacyRegistry)
            .map(PharmacyRegistry::new)
    }

    pub fn governance(&self) -> Result<Governance, ContractError> {
        self.bind(ContractName::Governance).map(Governance::new)
    }
}
