//! # Typed Facades
//!
//! One facade per logical contract. Writes wait for confirmation and, where
//! the contract emits an id, return it from the receipt's event.

pub mod doctor_registry;
pub mod governance;
pub mod patient_nft;
pub mod pharmacy_registry;
pub mod prescriptions;

pub use doctor_registry::DoctorRegistry;
pub use governance::Governance;
pub use patient_nft::PatientNft;
pub use pharmacy_registry::PharmacyRegistry;
pub use prescriptions::Prescriptions;

use crate::abi::Token;
use crate::contract::ContractHandle;
use crate::domain::errors::ContractError;
use crate::domain::rpc::TransactionReceipt;
use shared_types::{Address, U256};

/// Send a write and wait for its receipt.
pub(crate) async fn send(
    handle: &ContractHandle,
    method: &str,
    args: &[Token],
) -> Result<TransactionReceipt, ContractError> {
    handle.write(method, args).await?.wait().await
}

/// A `uint256` field of the first `event` in `receipt`.
pub(crate) fn event_uint(
    handle: &ContractHandle,
    receipt: &TransactionReceipt,
    event: &str,
    field: &str,
) -> Result<U256, ContractError> {
    let log = handle
        .find_event(receipt, event)
        .ok_or_else(|| ContractError::EventNotFound(event.to_string()))?;
    let value = log
        .get(field)
        .cloned()
        .ok_or_else(|| ContractError::EventNotFound(format!("{event}.{field}")))?;
    Ok(value.into_uint()?)
}

pub(crate) fn addresses(token: Token) -> Result<Vec<Address>, ContractError> {
    Ok(token
        .into_array()?
        .into_iter()
        .map(Token::into_address)
        .collect::<Result<_, _>>()?)
}

pub(crate) fn uints(token: Token) -> Result<Vec<U256>, ContractError> {
    Ok(token
        .into_array()?
        .into_iter()
        .map(Token::into_uint)
        .collect::<Result<_, _>>()?)
}
