//! Domain layer: JSON-RPC shapes, contract entities, errors.

pub mod entities;
pub mod errors;
pub mod rpc;
