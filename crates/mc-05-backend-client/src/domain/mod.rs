//! Domain layer: request/response shapes and errors.

pub mod errors;
pub mod types;
