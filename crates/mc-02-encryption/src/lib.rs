//! # Encryption Subsystem (MC-02)
//!
//! Client-side encryption of medical records with keys derived from wallet
//! signatures.
//!
//! ## Key Derivation
//!
//! | Step | Operation                                                     |
//! |------|---------------------------------------------------------------|
//! | 1    | Wallet signs [`KEY_DERIVATION_MESSAGE`]                       |
//! | 2    | Signature hex string is the raw key                           |
//! | 3    | PBKDF2-HMAC-SHA256, 1000 iterations, 16-byte salt → 256 bits  |
//! | 4    | AES-256-CBC / PKCS#7 with a 16-byte IV                        |
//! | 5    | HMAC-SHA256 tag over IV, salt and ciphertext                  |
//!
//! ## Shared Keys
//!
//! [`derive_shared_key`] yields a key bound to a grantee address, and
//! [`reencrypt`] moves an envelope from one key to another. Granting access
//! on-chain does not re-encrypt anything by itself.

pub mod cipher;
pub mod errors;
pub mod hashing;
pub mod key;
pub mod metadata;
pub mod service;

// Re-export public API
pub use cipher::{
    ciphertext_base64, decrypt, encrypt, reencrypt, EncryptedPayload, IV_SIZE, KEY_SIZE,
    PBKDF2_ITERATIONS, SALT_SIZE,
};
pub use errors::EncryptionError;
pub use hashing::{hash_data, verify_hash};
pub use key::{derive_key, derive_shared_key, share_message, RawKey, KEY_DERIVATION_MESSAGE};
pub use metadata::{metadata_key, MetadataStore};
pub use service::Encryptor;
