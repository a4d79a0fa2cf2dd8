//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Outbound (Driven)**: the wallet capabilities the store depends on

pub mod outbound;
