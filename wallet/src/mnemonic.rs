//! BIP-39 mnemonic and seed handling
//!
//! Entropy comes from the operating system RNG; the mnemonic wordlist and the
//! PBKDF2-HMAC-SHA512 seed stretching are delegated to the `bip39` crate.

use std::fmt;

use bip39::{Language, Mnemonic};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, WalletError};

/// Accepted entropy sizes in bits
pub const ENTROPY_STRENGTHS: [u32; 5] = [128, 160, 192, 224, 256];

/// Length of a BIP-39 seed in bytes
pub const SEED_LENGTH: usize = 64;

/// Check that `strength` is one of [`ENTROPY_STRENGTHS`]
pub fn check_strength(strength: u32) -> Result<()> {
    if !ENTROPY_STRENGTHS.contains(&strength) {
        return Err(WalletError::InvalidEntropyStrength(strength));
    }
    Ok(())
}

/// Draw `strength` bits of entropy from the OS CSPRNG
///
/// # Example
/// ```
/// use wallet::mnemonic::generate_entropy;
///
/// let entropy = generate_entropy(128).unwrap();
/// assert_eq!(entropy.len(), 16);
/// assert!(generate_entropy(100).is_err());
/// ```
pub fn generate_entropy(strength: u32) -> Result<Vec<u8>> {
    check_strength(strength)?;

    let mut entropy = vec![0u8; strength as usize / 8];
    OsRng.fill_bytes(&mut entropy);
    Ok(entropy)
}

/// English mnemonic for `entropy`
pub fn entropy_to_mnemonic(entropy: &[u8]) -> Result<MnemonicPhrase> {
    check_strength(entropy.len() as u32 * 8)?;

    let mnemonic = Mnemonic::from_entropy_in(Language::English, entropy)?;
    Ok(MnemonicPhrase { mnemonic })
}

/// Validate a mnemonic phrase
pub fn validate_mnemonic(phrase: &str) -> Result<()> {
    Mnemonic::parse_in(Language::English, phrase)?;
    Ok(())
}

/// Stretch a mnemonic phrase into its 64-byte seed
///
/// # Example
/// ```
/// use wallet::mnemonic::mnemonic_to_seed;
///
/// let phrase = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
/// let seed = mnemonic_to_seed(phrase, "").unwrap();
/// assert!(seed.to_hex().starts_with("5eb00bbddcf069084889a8ab9155568165f5c453"));
/// ```
pub fn mnemonic_to_seed(phrase: &str, passphrase: &str) -> Result<Seed> {
    Ok(MnemonicPhrase::from_phrase(phrase)?.to_seed(passphrase))
}

/// 64-byte BIP-39 seed
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; SEED_LENGTH]);

impl Seed {
    pub fn from_bytes(bytes: [u8; SEED_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Seed from a slice that must be exactly 64 bytes long
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; SEED_LENGTH] = bytes.try_into().map_err(|_| {
            WalletError::MalformedSeed(format!(
                "expected {} bytes, got {}",
                SEED_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    pub fn from_hex(seed_hex: &str) -> Result<Self> {
        let bytes = hex::decode(seed_hex.trim())
            .map_err(|e| WalletError::MalformedSeed(format!("invalid hex: {}", e)))?;
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(..)")
    }
}

/// Parsed English mnemonic
#[derive(Clone, PartialEq, Eq)]
pub struct MnemonicPhrase {
    mnemonic: Mnemonic,
}

impl MnemonicPhrase {
    /// Generate a new random mnemonic
    pub fn generate(strength: u32) -> Result<Self> {
        let entropy = generate_entropy(strength)?;
        entropy_to_mnemonic(&entropy)
    }

    /// Create from an existing phrase
    pub fn from_phrase(phrase: &str) -> Result<Self> {
        let mnemonic = Mnemonic::parse_in(Language::English, phrase)?;
        Ok(Self { mnemonic })
    }

    pub fn words(&self) -> Vec<String> {
        self.mnemonic.words().map(str::to_string).collect()
    }

    pub fn word_count(&self) -> usize {
        self.mnemonic.word_count()
    }

    pub fn entropy(&self) -> Vec<u8> {
        self.mnemonic.to_entropy()
    }

    pub fn to_seed(&self, passphrase: &str) -> Seed {
        Seed(self.mnemonic.to_seed(passphrase))
    }
}

impl fmt::Display for MnemonicPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic)
    }
}

impl fmt::Debug for MnemonicPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MnemonicPhrase")
            .field("words", &self.word_count())
            .finish_non_exhaustive()
    }
}
