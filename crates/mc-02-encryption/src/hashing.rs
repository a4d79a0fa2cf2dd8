//! SHA-256 content fingerprints.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of `data`.
#[must_use]
pub fn hash_data(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Whether `data` hashes to `expected` (hex, case-insensitive).
#[must_use]
pub fn verify_hash(data: &[u8], expected: &str) -> bool {
    hash_data(data).eq_ignore_ascii_case(expected.trim_start_matches("0x"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_known_vector() {
        assert_eq!(
            hash_data(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_verify_hash() {
        let digest = hash_data(b"record");
        assert!(verify_hash(b"record", &digest));
        assert!(verify_hash(b"record", &digest.to_uppercase()));
        assert!(!verify_hash(b"tampered", &digest));
    }
}
