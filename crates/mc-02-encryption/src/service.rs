//! # Encryptor Service
//!
//! Binds the envelope primitives to a wallet session. Every operation
//! re-derives the key through the wallet, which may prompt the user and may
//! be declined ([`EncryptionError::UserRejected`]).

use crate::cipher::{decrypt, encrypt, EncryptedPayload};
use crate::errors::EncryptionError;
use crate::key::{derive_key, derive_shared_key, RawKey, KEY_DERIVATION_MESSAGE};
use mc_01_wallet::{Signer, WalletSession};
use shared_types::Address;
use std::sync::Arc;
use tracing::{info, instrument};

/// Encrypts and decrypts on behalf of the connected account.
#[derive(Clone)]
pub struct Encryptor {
    signer: Arc<dyn Signer>,
    message: String,
}

impl Encryptor {
    /// Build from a signer using the standard derivation message.
    pub fn new(signer: Arc<dyn Signer>) -> Self {
        Self {
            signer,
            message: KEY_DERIVATION_MESSAGE.to_string(),
        }
    }

    /// Build from the current session, failing if there is none.
    pub fn for_session(session: Option<&WalletSession>) -> Result<Self, EncryptionError> {
        session
            .map(|s| Self::new(Arc::clone(&s.signer)))
            .ok_or(EncryptionError::WalletNotConnected)
    }

    /// Use a different derivation message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Account whose signature keys this encryptor.
    #[must_use]
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Derive the record key (prompts for a signature).
    pub async fn key(&self) -> Result<RawKey, EncryptionError> {
        derive_key(self.signer.as_ref(), &self.message).await
    }

    /// Encrypt a file's bytes.
    #[instrument(skip(self, data), fields(len = data.len()))]
    pub async fn encrypt_bytes(&self, data: &[u8]) -> Result<EncryptedPayload, EncryptionError> {
        let key = self.key().await?;
        let payload = encrypt(data, &key)?;
        info!(signer = %self.address(), "Record encrypted");
        Ok(payload)
    }

    /// Decrypt an envelope back to the original bytes.
    #[instrument(skip(self, payload))]
    pub async fn decrypt_bytes(
        &self,
        payload: &EncryptedPayload,
    ) -> Result<Vec<u8>, EncryptionError> {
        let key = self.key().await?;
        decrypt(payload, &key)
    }

    /// Encrypt UTF-8 text.
    pub async fn encrypt_text(&self, text: &str) -> Result<EncryptedPayload, EncryptionError> {
        self.encrypt_bytes(text.as_bytes()).await
    }

    /// Decrypt to UTF-8 text. Non-UTF-8 output counts as a failed decryption.
    pub async fn decrypt_text(
        &self,
        payload: &EncryptedPayload,
    ) -> Result<String, EncryptionError> {
        let bytes = self.decrypt_bytes(payload).await?;
        String::from_utf8(bytes).map_err(|_| EncryptionError::DecryptionFailed)
    }

    /// Derive the key shared with `grantee` (prompts for a signature).
    pub async fn create_shared_key(&self, grantee: &Address) -> Result<RawKey, EncryptionError> {
        derive_shared_key(self.signer.as_ref(), grantee).await
    }
}
