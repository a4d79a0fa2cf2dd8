//! Integration flows.

#[cfg(test)]
pub(crate) mod fixtures;

mod patient_records;
mod prescriptions;
mod session;
