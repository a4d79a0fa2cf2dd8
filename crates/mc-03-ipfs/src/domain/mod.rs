//! Domain layer: errors, upload results, configuration.

pub mod config;
pub mod errors;
pub mod types;
