//! Octra address format
//!
//! `oct` followed by the Base58 encoding of `SHA-256(public_key)`. There is
//! no version byte and no checksum, so validation only checks the shape.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;

use crate::{hash_sha256, CryptoError};

pub const ADDRESS_PREFIX: &str = "oct";

/// Total length of a well-formed address, prefix included
pub const ADDRESS_LENGTH: usize = 47;

/// Bitcoin Base58 alphabet (no `0`, `O`, `I`, `l`)
pub const BASE58_ALPHABET: &[u8; 58] =
    b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Base58-encode `bytes` as one big-endian number
///
/// Every leading zero byte adds a `'1'` in front of the numeric encoding, and
/// an empty input encodes to an empty string.
pub fn base58_encode(bytes: &[u8]) -> String {
    let leading_zeros = bytes.iter().take_while(|&&b| b == 0).count();

    let value = BigUint::from_bytes_be(bytes);
    let digits = if value.bits() == 0 {
        Vec::new()
    } else {
        value.to_radix_be(58)
    };

    let mut encoded = String::with_capacity(leading_zeros + digits.len());
    encoded.extend(std::iter::repeat('1').take(leading_zeros));
    encoded.extend(digits.iter().map(|&d| BASE58_ALPHABET[d as usize] as char));
    encoded
}

/// Address for an Ed25519 public key
///
/// The encoder does not pad. Digests with a small numeric value produce a
/// string shorter than [`ADDRESS_LENGTH`], which [`validate_address`] rejects.
pub fn encode_address(public_key: &[u8; 32]) -> Address {
    let digest = hash_sha256(public_key);
    Address(format!("{}{}", ADDRESS_PREFIX, base58_encode(&digest)))
}

/// Shape check: prefix, exact length, and Base58 alphabet
pub fn validate_address(address: &str) -> bool {
    let Some(body) = address.strip_prefix(ADDRESS_PREFIX) else {
        return false;
    };

    address.len() == ADDRESS_LENGTH && body.bytes().all(|b| BASE58_ALPHABET.contains(&b))
}

/// Octra account address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    pub fn from_public_key(public_key: &[u8; 32]) -> Self {
        encode_address(public_key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this address passes [`validate_address`]
    pub fn is_valid(&self) -> bool {
        validate_address(&self.0)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !validate_address(s) {
            return Err(CryptoError::InvalidAddressFormat(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base58_small_values() {
        assert_eq!(base58_encode(&[]), "");
        assert_eq!(base58_encode(&[1]), "2");
        assert_eq!(base58_encode(&[57]), "z");
        assert_eq!(base58_encode(&[58]), "21");
        assert_eq!(base58_encode(&[0, 0, 1]), "112");
        assert_eq!(base58_encode(&[0, 0, 0]), "111");
    }

    #[test]
    fn test_base58_full_width() {
        assert_eq!(
            base58_encode(&[0xff; 32]),
            "JEKNVnkbo3jma5nREBBJCDoXFVeKkD56V3xKrvRmWxFG"
        );
    }

    #[test]
    fn test_base58_leading_zero_adds_one() {
        let mut digest = [0xff; 32];
        let without = base58_encode(&digest[1..]);
        digest[0] = 0;
        let with = base58_encode(&digest);

        assert_eq!(with, format!("1{}", without));
        assert_eq!(with, "14uQeVj5tqViQh7yWWGStvkEG1Zmhx6uasJtWCJziofL");
    }

    #[test]
    fn test_encode_address_vectors() {
        let address = encode_address(&[0u8; 32]);
        assert_eq!(address.as_str(), "oct7tkzFg8RHBmMw1ncRJZCCZAizgq4rwCftTKYLce8RU8t");
        assert!(address.is_valid());

        let address = encode_address(&[4u8; 32]);
        assert_eq!(address.as_str(), "octBitKiLpmvxw9wX6Jyc3w4SRFMjmw6RbbVheo7uwAm3VW");
        assert_eq!(address.as_str().len(), ADDRESS_LENGTH);
    }

    #[test]
    fn test_encode_address_round_trips_through_validation() {
        for byte in 0u8..8 {
            let address = encode_address(&[byte; 32]);
            assert!(address.as_str().starts_with(ADDRESS_PREFIX));
            assert!(validate_address(address.as_str()), "{}", address);
            assert_eq!(address.as_str().parse::<Address>().unwrap(), address);
        }
    }

    #[test]
    fn test_short_digest_is_not_padded() {
        // SHA-256 of 32 x 0x11 encodes to 43 digits
        let address = encode_address(&[17u8; 32]);
        assert_eq!(address.as_str(), "octC3ZhAr8uB9JRf9ChbJ61cRh3yTqzmJqnwmEajVDzyuD");
        assert_eq!(address.as_str().len(), ADDRESS_LENGTH - 1);
        assert!(!address.is_valid());
    }

    #[test]
    fn test_validate_address_rejections() {
        let valid = "oct7tkzFg8RHBmMw1ncRJZCCZAizgq4rwCftTKYLce8RU8t";
        assert!(validate_address(valid));

        assert!(!validate_address(""));
        assert!(!validate_address("oct"));
        assert!(!validate_address(&valid.replacen("oct", "OCT", 1)));
        assert!(!validate_address(&valid.replacen("oct", "xyz", 1)));
        assert!(!validate_address(&valid[..46]));
        assert!(!validate_address(&format!("{}1", valid)));

        for bad in ['0', 'O', 'I', 'l', '+', ' '] {
            let mut corrupted = valid.to_string();
            corrupted.replace_range(10..11, &bad.to_string());
            assert!(!validate_address(&corrupted), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_validate_address_non_ascii_length() {
        // 47 bytes but not 47 base58 characters
        let tricky = format!("oct{}é", "1".repeat(42));
        assert_eq!(tricky.len(), ADDRESS_LENGTH);
        assert!(!validate_address(&tricky));
    }

    #[test]
    fn test_parse_invalid_address() {
        let err = "octnope".parse::<Address>().unwrap_err();
        assert_eq!(err, CryptoError::InvalidAddressFormat("octnope".to_string()));
    }
}
