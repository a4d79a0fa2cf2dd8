//! # Envelope Encryption
//!
//! AES-256-CBC with PKCS#7 padding under a PBKDF2-stretched key, sealed with
//! an HMAC-SHA256 tag.
//!
//! ## Pipeline
//!
//! ```text
//! raw key ──PBKDF2-HMAC-SHA256(salt, 1000)──► 256-bit key ──► AES-256-CBC(iv)
//!                                                 │
//!                                                 └─HMAC──► mac key ──► tag(iv ‖ salt ‖ ct)
//! ```
//!
//! ## Properties
//!
//! - IV and salt are fresh random bytes for every call.
//! - The tag is checked (constant time) before any decryption, so a wrong
//!   key or a modified IV, salt or ciphertext always yields
//!   [`EncryptionError::DecryptionFailed`] and never wrong plaintext.

use crate::errors::EncryptionError;
use crate::key::RawKey;
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::debug;
use zeroize::Zeroizing;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;
type HmacSha256 = Hmac<Sha256>;

/// PBKDF2 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 1000;
/// Stretched key length in bytes (256 bits).
pub const KEY_SIZE: usize = 32;
/// CBC initialization vector length.
pub const IV_SIZE: usize = 16;
/// PBKDF2 salt length.
pub const SALT_SIZE: usize = 16;
/// HMAC-SHA256 tag length.
pub const MAC_SIZE: usize = 32;

const MAC_KEY_LABEL: &[u8] = b"medichain/envelope-mac/v1";

/// An encrypted blob with everything needed to decrypt it except the key.
///
/// Serializes to JSON with base64 fields:
/// `{"encryptedData": "…", "iv": "…", "salt": "…", "mac": "…"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    /// AES-256-CBC ciphertext.
    #[serde(rename = "encryptedData", with = "b64")]
    pub ciphertext: Vec<u8>,
    /// CBC initialization vector.
    #[serde(with = "b64")]
    pub iv: [u8; IV_SIZE],
    /// PBKDF2 salt.
    #[serde(with = "b64")]
    pub salt: [u8; SALT_SIZE],
    /// HMAC-SHA256 over `iv ‖ salt ‖ ciphertext`.
    #[serde(with = "b64")]
    pub mac: [u8; MAC_SIZE],
}

impl EncryptedPayload {
    /// JSON form used for uploads and local metadata.
    pub fn to_json(&self) -> Result<String, EncryptionError> {
        serde_json::to_string(self).map_err(|e| EncryptionError::InvalidPayload(e.to_string()))
    }

    /// Parse the JSON form.
    pub fn from_json(json: &str) -> Result<Self, EncryptionError> {
        serde_json::from_str(json).map_err(|e| EncryptionError::InvalidPayload(e.to_string()))
    }

    /// Parse the JSON form from raw bytes (e.g. a downloaded blob).
    pub fn from_slice(bytes: &[u8]) -> Result<Self, EncryptionError> {
        serde_json::from_slice(bytes).map_err(|e| EncryptionError::InvalidPayload(e.to_string()))
    }
}

mod b64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer, T: AsRef<[u8]>>(bytes: &T, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&STANDARD.encode(bytes.as_ref()))
    }

    pub fn deserialize<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<Vec<u8>>,
    {
        let s = String::deserialize(d)?;
        let bytes = STANDARD.decode(s).map_err(de::Error::custom)?;
        T::try_from(bytes).map_err(|_| de::Error::custom("unexpected field length"))
    }
}

/// Stretch the raw key with PBKDF2-HMAC-SHA256.
fn stretch(key: &RawKey, salt: &[u8; SALT_SIZE]) -> Zeroizing<[u8; KEY_SIZE]> {
    let mut out = Zeroizing::new([0u8; KEY_SIZE]);
    pbkdf2::pbkdf2_hmac::<Sha256>(key.as_bytes(), salt, PBKDF2_ITERATIONS, &mut *out);
    out
}

fn mac_for(
    stretched: &[u8; KEY_SIZE],
    iv: &[u8; IV_SIZE],
    salt: &[u8; SALT_SIZE],
    ciphertext: &[u8],
) -> Result<HmacSha256, EncryptionError> {
    let mut label = HmacSha256::new_from_slice(stretched)
        .map_err(|_| EncryptionError::InvalidPayload("bad key length".into()))?;
    label.update(MAC_KEY_LABEL);
    let mac_key: Zeroizing<[u8; MAC_SIZE]> = Zeroizing::new(label.finalize().into_bytes().into());

    let mut mac = HmacSha256::new_from_slice(mac_key.as_slice())
        .map_err(|_| EncryptionError::InvalidPayload("bad key length".into()))?;
    mac.update(iv);
    mac.update(salt);
    mac.update(ciphertext);
    Ok(mac)
}

/// Encrypt `plaintext` under `key` with a fresh IV and salt.
pub fn encrypt(plaintext: &[u8], key: &RawKey) -> Result<EncryptedPayload, EncryptionError> {
    let mut rng = rand::thread_rng();
    let mut iv = [0u8; IV_SIZE];
    let mut salt = [0u8; SALT_SIZE];
    rng.fill_bytes(&mut iv);
    rng.fill_bytes(&mut salt);

    let stretched = stretch(key, &salt);
    let aes_key: &[u8; KEY_SIZE] = &stretched;
    let ciphertext = Aes256CbcEnc::new(aes_key.into(), (&iv).into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);
    let mac: [u8; MAC_SIZE] = mac_for(&stretched, &iv, &salt, &ciphertext)?
        .finalize()
        .into_bytes()
        .into();

    debug!(
        plaintext_len = plaintext.len(),
        ciphertext_len = ciphertext.len(),
        "Payload encrypted"
    );

    Ok(EncryptedPayload {
        ciphertext,
        iv,
        salt,
        mac,
    })
}

/// Decrypt an envelope. Any mismatch is [`EncryptionError::DecryptionFailed`].
pub fn decrypt(payload: &EncryptedPayload, key: &RawKey) -> Result<Vec<u8>, EncryptionError> {
    let stretched = stretch(key, &payload.salt);
    mac_for(&stretched, &payload.iv, &payload.salt, &payload.ciphertext)?
        .verify_slice(&payload.mac)
        .map_err(|_| EncryptionError::DecryptionFailed)?;

    let aes_key: &[u8; KEY_SIZE] = &stretched;
    Aes256CbcDec::new(aes_key.into(), (&payload.iv).into())
        .decrypt_padded_vec_mut::<Pkcs7>(&payload.ciphertext)
        .map_err(|_| EncryptionError::DecryptionFailed)
}

/// Decrypt under `old_key` and encrypt the plaintext again under `new_key`.
pub fn reencrypt(
    payload: &EncryptedPayload,
    old_key: &RawKey,
    new_key: &RawKey,
) -> Result<EncryptedPayload, EncryptionError> {
    let plaintext = Zeroizing::new(decrypt(payload, old_key)?);
    encrypt(&plaintext, new_key)
}

/// Base64 view of a payload's ciphertext, for display.
#[must_use]
pub fn ciphertext_base64(payload: &EncryptedPayload) -> String {
    STANDARD.encode(&payload.ciphertext)
}
