//! # MediChain Test Suite
//!
//! Cross-subsystem flows driven through the public APIs of every crate.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs          # shared MockChain + in-memory IPFS world
//!     ├── patient_records.rs   # encrypt → pin → record → fetch → decrypt
//!     ├── prescriptions.rs     # doctor issues, pharmacy scans and dispenses
//!     └── session.rs           # key determinism, network-change reloads
//! ```
//!
//! Every party in a test gets its own container, keyring and local store,
//! and they all share one chain and one IPFS network.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p medichain-tests
//! cargo test -p medichain-tests integration::prescriptions
//! ```

pub mod integration;
