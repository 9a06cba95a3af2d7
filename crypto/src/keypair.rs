//! Ed25519 key pairs and the signing self-test

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

use crate::address::{encode_address, Address};
use crate::hd::ExtendedKey;
use crate::CryptoError;

/// Payload signed by [`KeyPair::self_test`]
pub const SELF_TEST_MESSAGE: &str = r#"{"from":"test","to":"test","amount":"1000000","nonce":1}"#;

/// Outcome of a sign/verify round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfTestReport {
    pub message: &'static str,
    pub signature: [u8; 64],
    pub valid: bool,
}

/// Key pair for signing
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl KeyPair {
    /// Key pair for a 32-byte Ed25519 seed
    pub fn from_private_key(private_key: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(private_key);
        let verifying_key = signing_key.verifying_key();

        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Create keypair from private key hex
    pub fn from_private_key_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(hex_str).map_err(|_| CryptoError::InvalidPrivateKey)?;

        let key_bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidPrivateKey)?;

        Ok(Self::from_private_key(&key_bytes))
    }

    pub fn private_key_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.verifying_key.to_bytes()
    }

    /// Get public key as hex string
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.verifying_key.as_bytes())
    }

    /// Get private key as hex string
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    pub fn address(&self) -> Address {
        encode_address(&self.public_key_bytes())
    }

    /// Sign message
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Verify signature against an arbitrary public key
    pub fn verify(
        public_key: &[u8; 32],
        message: &[u8],
        signature_bytes: &[u8],
    ) -> Result<(), CryptoError> {
        let verifying_key =
            VerifyingKey::from_bytes(public_key).map_err(|_| CryptoError::InvalidPublicKey)?;

        let sig_array: [u8; 64] = signature_bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidSignature)?;

        let signature = Signature::from_bytes(&sig_array);

        verifying_key
            .verify(message, &signature)
            .map_err(|_| CryptoError::InvalidSignature)
    }

    /// Sign [`SELF_TEST_MESSAGE`] and verify it with this pair's own public key
    pub fn self_test(&self) -> SelfTestReport {
        let message = SELF_TEST_MESSAGE;
        let signature = self.sign(message.as_bytes());
        let valid = Self::verify(&self.public_key_bytes(), message.as_bytes(), &signature).is_ok();

        SelfTestReport {
            message,
            signature,
            valid,
        }
    }
}

impl From<&ExtendedKey> for KeyPair {
    fn from(key: &ExtendedKey) -> Self {
        Self::from_private_key(key.private_key())
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key_hex())
            .finish_non_exhaustive()
    }
}
