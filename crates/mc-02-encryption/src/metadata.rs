//! # Encryption Metadata Store
//!
//! Keeps a local copy of each record's envelope under
//! `encryption_{tokenId}_{recordIndex}`, so a record uploaded from this
//! device can be decrypted without re-downloading its parameters.

use crate::cipher::EncryptedPayload;
use crate::errors::EncryptionError;
use shared_types::LocalStore;
use std::sync::Arc;
use tracing::warn;

/// Storage key for one record's envelope.
#[must_use]
pub fn metadata_key(token_id: &str, record_index: usize) -> String {
    format!("encryption_{token_id}_{record_index}")
}

/// Envelope cache over a [`LocalStore`].
#[derive(Clone)]
pub struct MetadataStore {
    store: Arc<dyn LocalStore>,
}

impl MetadataStore {
    /// Wrap a local store.
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Save the envelope for a record.
    pub fn save(
        &self,
        token_id: &str,
        record_index: usize,
        payload: &EncryptedPayload,
    ) -> Result<(), EncryptionError> {
        self.store
            .set(&metadata_key(token_id, record_index), &payload.to_json()?)?;
        Ok(())
    }

    /// Load the envelope for a record. Missing or unreadable entries are `None`.
    #[must_use]
    pub fn load(&self, token_id: &str, record_index: usize) -> Option<EncryptedPayload> {
        let key = metadata_key(token_id, record_index);
        match self.store.get(&key) {
            Ok(Some(json)) => match EncryptedPayload::from_json(&json) {
                Ok(payload) => Some(payload),
                Err(e) => {
                    warn!(key = %key, error = %e, "Discarding unreadable encryption metadata");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key = %key, error = %e, "Encryption metadata unavailable");
                None
            }
        }
    }

    /// Forget a record's envelope.
    pub fn remove(&self, token_id: &str, record_index: usize) -> Result<(), EncryptionError> {
        self.store.remove(&metadata_key(token_id, record_index))?;
        Ok(())
    }
}
