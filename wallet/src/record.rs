//! Generated wallet record and its export formats

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use octra_crypto::{ExtendedKey, KeyPair, SelfTestReport};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WalletError};
use crate::mnemonic::{MnemonicPhrase, Seed};

/// Everything produced by one wallet generation
///
/// Field names match the JSON emitted by other Octra wallet generators so
/// records can be exchanged between them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRecord {
    mnemonic: Vec<String>,
    seed_hex: String,
    master_chain_hex: String,
    private_key_hex: String,
    public_key_hex: String,
    private_key_b64: String,
    public_key_b64: String,
    address: String,
    entropy_hex: String,
    test_message: String,
    test_signature: String,
    signature_valid: bool,
}

impl WalletRecord {
    pub(crate) fn new(
        entropy: &[u8],
        mnemonic: &MnemonicPhrase,
        seed: &Seed,
        master: &ExtendedKey,
        keypair: &KeyPair,
        self_test: &SelfTestReport,
    ) -> Self {
        let private_key = keypair.private_key_bytes();
        let public_key = keypair.public_key_bytes();

        Self {
            mnemonic: mnemonic.words(),
            seed_hex: seed.to_hex(),
            master_chain_hex: master.chain_code().to_hex(),
            private_key_hex: hex::encode(private_key),
            public_key_hex: hex::encode(public_key),
            private_key_b64: BASE64.encode(private_key),
            public_key_b64: BASE64.encode(public_key),
            address: keypair.address().into_string(),
            entropy_hex: hex::encode(entropy),
            test_message: self_test.message.to_string(),
            test_signature: BASE64.encode(self_test.signature),
            signature_valid: self_test.valid,
        }
    }

    pub fn mnemonic(&self) -> &[String] {
        &self.mnemonic
    }

    pub fn mnemonic_phrase(&self) -> String {
        self.mnemonic.join(" ")
    }

    pub fn seed_hex(&self) -> &str {
        &self.seed_hex
    }

    pub fn master_chain_hex(&self) -> &str {
        &self.master_chain_hex
    }

    pub fn private_key_hex(&self) -> &str {
        &self.private_key_hex
    }

    pub fn public_key_hex(&self) -> &str {
        &self.public_key_hex
    }

    pub fn private_key_b64(&self) -> &str {
        &self.private_key_b64
    }

    pub fn public_key_b64(&self) -> &str {
        &self.public_key_b64
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn entropy_hex(&self) -> &str {
        &self.entropy_hex
    }

    pub fn test_message(&self) -> &str {
        &self.test_message
    }

    pub fn test_signature(&self) -> &str {
        &self.test_signature
    }

    pub fn signature_valid(&self) -> bool {
        self.signature_valid
    }

    /// Re-derive the identity key from the mnemonic and compare every field
    ///
    /// Catches records that were edited or corrupted after generation.
    pub fn verify(&self, passphrase: &str) -> Result<()> {
        let mnemonic = MnemonicPhrase::from_phrase(&self.mnemonic_phrase())?;
        let seed = mnemonic.to_seed(passphrase);
        let master = ExtendedKey::master(seed.as_bytes());
        let keypair = KeyPair::from(&master);

        let checks = [
            ("entropy_hex", hex::encode(mnemonic.entropy()) == self.entropy_hex),
            ("seed_hex", seed.to_hex() == self.seed_hex),
            ("master_chain_hex", master.chain_code().to_hex() == self.master_chain_hex),
            ("private_key_hex", keypair.private_key_hex() == self.private_key_hex),
            ("public_key_hex", keypair.public_key_hex() == self.public_key_hex),
            ("private_key_b64", BASE64.encode(keypair.private_key_bytes()) == self.private_key_b64),
            ("public_key_b64", BASE64.encode(keypair.public_key_bytes()) == self.public_key_b64),
            ("address", keypair.address().as_str() == self.address),
        ];
        for (field, matches) in checks {
            if !matches {
                return Err(WalletError::RecordMismatch(field));
            }
        }

        let signature = BASE64
            .decode(&self.test_signature)
            .map_err(|_| WalletError::RecordMismatch("test_signature"))?;
        KeyPair::verify(
            &keypair.public_key_bytes(),
            self.test_message.as_bytes(),
            &signature,
        )
        .map_err(|_| WalletError::RecordMismatch("test_signature"))?;

        Ok(())
    }

    /// Plain-text wallet document
    pub fn export_document(&self, generated_at: DateTime<Utc>) -> String {
        format!(
            "OCTRA WALLET\n\
             {rule}\n\
             \n\
             SECURITY WARNING: KEEP THIS FILE SECURE AND NEVER SHARE YOUR PRIVATE KEY\n\
             \n\
             Generated: {generated}\n\
             Address Format: oct + Base58(SHA256(pubkey))\n\
             \n\
             Mnemonic: {mnemonic}\n\
             Private Key (B64): {private_key}\n\
             Public Key (B64): {public_key}\n\
             Address: {address}\n\
             \n\
             Technical Details:\n\
             Entropy: {entropy}\n\
             Signature Algorithm: Ed25519\n\
             Derivation: BIP39-compatible (PBKDF2-HMAC-SHA512, 2048 iterations)\n",
            rule = "=".repeat(50),
            generated = generated_at.format("%Y-%m-%d %H:%M:%S"),
            mnemonic = self.mnemonic_phrase(),
            private_key = self.private_key_b64,
            public_key = self.public_key_b64,
            address = self.address,
            entropy = self.entropy_hex,
        )
    }

    /// `octra_wallet_<last 8 address chars>_<unix seconds>.txt`
    pub fn export_file_name(&self, timestamp: i64) -> String {
        let chars: Vec<char> = self.address.chars().collect();
        let tail: String = chars[chars.len().saturating_sub(8)..].iter().collect();
        format!("octra_wallet_{}_{}.txt", tail, timestamp)
    }

    /// Write the plain-text document into `dir`, returning the file path
    pub fn write_export<P: AsRef<Path>>(&self, dir: P, generated_at: DateTime<Utc>) -> Result<PathBuf> {
        let path = dir
            .as_ref()
            .join(self.export_file_name(generated_at.timestamp()));
        fs::write(&path, self.export_document(generated_at))?;
        Ok(path)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Save the record as JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    /// Load a record saved with [`WalletRecord::save_to_file`]
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }
}

impl std::fmt::Debug for WalletRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("WalletRecord")
            .field("address", &self.address)
            .field("public_key_hex", &self.public_key_hex)
            .field("signature_valid", &self.signature_valid)
            .finish_non_exhaustive()
    }
}
