//! Domain layer: signatures, transactions, sessions, networks.

pub mod errors;
pub mod networks;
pub mod session;
pub mod signature;
pub mod transaction;
pub mod units;
