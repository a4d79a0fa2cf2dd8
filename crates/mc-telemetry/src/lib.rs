//! # MediChain Telemetry
//!
//! Structured logging for the runtime and CLI.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let config = mc_telemetry::TelemetryConfig::from_env();
//! mc_telemetry::init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable            | Default     | Description                 |
//! |---------------------|-------------|-----------------------------|
//! | `RUST_LOG`          | -           | Filter directive (wins)     |
//! | `MC_LOG_LEVEL`      | `info`      | Filter directive            |
//! | `MC_JSON_LOGS`      | `false`     | JSON lines output           |
//! | `MC_CONSOLE_OUTPUT` | `true`      | Write to the console at all |
//! | `MC_SERVICE_NAME`   | `medichain` | Service name                |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{env_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Logging is already initialized")]
    AlreadyInitialized,

    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),
}
