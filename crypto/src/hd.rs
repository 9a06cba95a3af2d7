//! Hierarchical deterministic key derivation for Ed25519
//!
//! The master key is HMAC-SHA512 of the seed keyed with the Octra domain
//! constant. Child keys are HMAC-SHA512 keyed with the parent chain code:
//!
//! - hardened (`index >= 2^31`): `0x00 || parent_key || index_be`
//! - non-hardened: `ed25519_public(parent_key) || index_be`
//!
//! In both cases the left half of the output becomes the child key (used as an
//! Ed25519 seed) and the right half becomes the child chain code. There is no
//! public-only derivation: every level needs the parent private key.

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::SigningKey;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::CryptoError;

type HmacSha512 = Hmac<Sha512>;

/// HMAC key used to derive the master key from a seed
pub const MASTER_KEY_DOMAIN: &[u8] = b"Octra seed";

/// First hardened child index
pub const HARDENED: u32 = 1 << 31;

/// Child index; the high bit selects hardened derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildIndex(u32);

impl ChildIndex {
    /// Index exactly as given, hardened only if the high bit is already set
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Index with the hardened bit forced on
    pub const fn hardened(index: u32) -> Self {
        Self(index | HARDENED)
    }

    pub const fn is_hardened(self) -> bool {
        self.0 & HARDENED != 0
    }

    /// Raw 32-bit value, including the hardened bit
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Index with the hardened bit masked off
    pub const fn position(self) -> u32 {
        self.0 & !HARDENED
    }
}

impl From<u32> for ChildIndex {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<ChildIndex> for u32 {
    fn from(index: ChildIndex) -> Self {
        index.0
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_hardened() {
            write!(f, "{}'", self.position())
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for ChildIndex {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CryptoError::InvalidDerivationPath(format!("bad child index '{}'", s));

        match s.strip_suffix('\'').or_else(|| s.strip_suffix('h')) {
            Some(position) => {
                let position: u32 = position.parse().map_err(|_| invalid())?;
                if position >= HARDENED {
                    return Err(invalid());
                }
                Ok(Self::hardened(position))
            }
            None => s.parse().map(Self).map_err(|_| invalid()),
        }
    }
}

/// Ordered list of child indices applied from the master key
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath(Vec<ChildIndex>);

impl DerivationPath {
    pub fn new(indices: Vec<ChildIndex>) -> Self {
        Self(indices)
    }

    pub fn push(&mut self, index: ChildIndex) {
        self.0.push(index);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChildIndex> {
        self.0.iter()
    }

    /// Raw index values, hardened bit included
    pub fn to_u32_vec(&self) -> Vec<u32> {
        self.0.iter().map(|index| index.raw()).collect()
    }
}

impl AsRef<[ChildIndex]> for DerivationPath {
    fn as_ref(&self) -> &[ChildIndex] {
        &self.0
    }
}

impl From<Vec<u32>> for DerivationPath {
    fn from(raw: Vec<u32>) -> Self {
        raw.into_iter().map(ChildIndex::from).collect()
    }
}

impl FromIterator<ChildIndex> for DerivationPath {
    fn from_iter<I: IntoIterator<Item = ChildIndex>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", index)?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = CryptoError;

    /// Parses `345'/0'/7` or `m/345'/0'/7`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = match s {
            "" | "m" => return Ok(Self::default()),
            _ => s.strip_prefix("m/").unwrap_or(s),
        };

        body.split('/').map(ChildIndex::from_str).collect()
    }
}

/// 32-byte chain code carried alongside every key in the tree
#[derive(Clone, Copy, PartialEq, Eq, Zeroize)]
pub struct ChainCode([u8; 32]);

impl ChainCode {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for ChainCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChainCode(..)")
    }
}

/// Private key material plus chain code at one node of the tree
///
/// The master key and every child key share this shape. The private key is
/// used as a 32-byte Ed25519 seed, not as a curve scalar.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ExtendedKey {
    private_key: [u8; 32],
    chain_code: ChainCode,
}

impl ExtendedKey {
    pub fn from_parts(private_key: [u8; 32], chain_code: ChainCode) -> Self {
        Self {
            private_key,
            chain_code,
        }
    }

    /// Master key for a seed
    pub fn master(seed: &[u8]) -> Self {
        let mut mac = hmac_sha512(MASTER_KEY_DOMAIN);
        mac.update(seed);
        Self::from_mac(mac)
    }

    pub fn private_key(&self) -> &[u8; 32] {
        &self.private_key
    }

    pub fn chain_code(&self) -> &ChainCode {
        &self.chain_code
    }

    pub fn signing_key(&self) -> SigningKey {
        SigningKey::from_bytes(&self.private_key)
    }

    /// Ed25519 public key for this node
    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key().verifying_key().to_bytes()
    }

    /// One derivation step
    pub fn derive_child(&self, index: ChildIndex) -> Self {
        let mut mac = hmac_sha512(self.chain_code.as_bytes());

        if index.is_hardened() {
            mac.update(&[0x00]);
            mac.update(&self.private_key);
        } else {
            mac.update(&self.public_key());
        }
        mac.update(&index.raw().to_be_bytes());

        Self::from_mac(mac)
    }

    /// Fold [`ExtendedKey::derive_child`] over every index of `path`, in order
    pub fn derive_path(&self, path: &DerivationPath) -> Self {
        path.iter()
            .fold(self.clone(), |key, &index| key.derive_child(index))
    }

    fn from_mac(mac: HmacSha512) -> Self {
        let mut output = Zeroizing::new([0u8; 64]);
        output.copy_from_slice(&mac.finalize().into_bytes());

        let mut private_key = [0u8; 32];
        let mut chain_code = [0u8; 32];
        private_key.copy_from_slice(&output[..32]);
        chain_code.copy_from_slice(&output[32..]);

        Self {
            private_key,
            chain_code: ChainCode(chain_code),
        }
    }
}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedKey").finish_non_exhaustive()
    }
}

/// Derive the master key and chain code from a seed
pub fn derive_master_key(seed: &[u8]) -> ExtendedKey {
    ExtendedKey::master(seed)
}

/// Derive one child of `parent`
pub fn derive_child(parent: &ExtendedKey, index: ChildIndex) -> ExtendedKey {
    parent.derive_child(index)
}

/// Derive the key at `path` below the master key of `seed`
pub fn derive_path(seed: &[u8], path: &DerivationPath) -> ExtendedKey {
    derive_master_key(seed).derive_path(path)
}

fn hmac_sha512(key: &[u8]) -> HmacSha512 {
    HmacSha512::new_from_slice(key).expect("HMAC accepts keys of any length")
}
