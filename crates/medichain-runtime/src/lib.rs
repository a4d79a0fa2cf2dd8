//! # MediChain Runtime
//!
//! Wires the subsystems into one application and hosts the role dashboards.
//!
//! ## Layout
//!
//! | Module        | Role                                                   |
//! |---------------|--------------------------------------------------------|
//! | [`config`]    | `MEDICHAIN_*` environment configuration                 |
//! | [`container`] | builds provider, wallet, contracts, IPFS and backend    |
//! | [`screens`]   | patient, doctor, pharmacy and admin flows               |
//! | [`qr`]        | health passport and prescription QR payloads            |
//!
//! ## Session Flow
//!
//! ```text
//! WalletStore ──SessionEvent──► ScreenHost ──refresh/reset──► Screen
//!                                   │
//!                                   └── ReloadRequested ──► auto_connect
//! ```

pub mod config;
pub mod container;
pub mod qr;
pub mod screens;

#[cfg(test)]
mod testing;

// Re-export public API
pub use config::{AppConfig, ConfigError};
pub use container::{AppContainer, ContainerError};
pub use qr::{HealthPassport, PrescriptionCode};
pub use screens::{
    AdminDashboard, DoctorDashboard, PatientDashboard, PharmacyDashboard, ProgressObserver,
    RecordFile, Screen, ScreenError, ScreenHost, ScreenState, UploadStage,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
