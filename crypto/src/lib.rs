//! Octra Cryptography
//!
//! Hierarchical deterministic Ed25519 key derivation, Octra address
//! encoding and signature checks.

pub mod address;
pub mod hd;
pub mod keypair;

use sha2::{Digest, Sha256};
use thiserror::Error;

pub use address::{base58_encode, encode_address, validate_address, Address, ADDRESS_LENGTH, ADDRESS_PREFIX};
pub use hd::{derive_child, derive_master_key, derive_path, ChainCode, ChildIndex, DerivationPath, ExtendedKey, HARDENED};
pub use keypair::{KeyPair, SelfTestReport, SELF_TEST_MESSAGE};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid public key")]
    InvalidPublicKey,

    #[error("Invalid private key")]
    InvalidPrivateKey,

    #[error("Invalid address format: {0}")]
    InvalidAddressFormat(String),

    #[error("Invalid derivation path: {0}")]
    InvalidDerivationPath(String),
}

/// Hash data with SHA256
pub fn hash_sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash data and return as hex string
pub fn hash_sha256_hex(data: &[u8]) -> String {
    hex::encode(hash_sha256(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_sha256_empty() {
        assert_eq!(
            hash_sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_hash_sha256_matches_hex() {
        let digest = hash_sha256(b"octra");
        assert_eq!(hex::encode(digest), hash_sha256_hex(b"octra"));
    }
}
