//! Staged wallet generation
//!
//! ```text
//! EntropyGenerated -> MnemonicCreated -> SeedDerived -> MasterKeyDerived
//!   -> KeyPairCreated -> AddressGenerated -> AddressValidated
//!   -> SelfTestPassed -> Complete
//! ```
//!
//! Any failing step moves the run to `Failed` and returns the error. Nothing
//! is retried: the derivation is deterministic, so only fresh entropy can
//! change the outcome.

use std::fmt;

use log::{debug, error, info};
use octra_crypto::{ExtendedKey, KeyPair};
use serde::Serialize;

use crate::error::{Result, WalletError};
use crate::mnemonic::{check_strength, entropy_to_mnemonic, generate_entropy};
use crate::record::WalletRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GenerationStage {
    EntropyGenerated,
    MnemonicCreated,
    SeedDerived,
    MasterKeyDerived,
    KeyPairCreated,
    AddressGenerated,
    AddressValidated,
    SelfTestPassed,
    Complete,
    Failed,
}

impl GenerationStage {
    /// Stages of a successful run, in order
    pub const SUCCESS_PATH: [GenerationStage; 9] = [
        GenerationStage::EntropyGenerated,
        GenerationStage::MnemonicCreated,
        GenerationStage::SeedDerived,
        GenerationStage::MasterKeyDerived,
        GenerationStage::KeyPairCreated,
        GenerationStage::AddressGenerated,
        GenerationStage::AddressValidated,
        GenerationStage::SelfTestPassed,
        GenerationStage::Complete,
    ];

    pub fn status(&self) -> &'static str {
        match self {
            GenerationStage::EntropyGenerated => "Entropy generated",
            GenerationStage::MnemonicCreated => "Mnemonic created",
            GenerationStage::SeedDerived => "Seed derived",
            GenerationStage::MasterKeyDerived => "Master key derived",
            GenerationStage::KeyPairCreated => "Keypair created",
            GenerationStage::AddressGenerated => "Address generated",
            GenerationStage::AddressValidated => "Address verified",
            GenerationStage::SelfTestPassed => "Signature test passed",
            GenerationStage::Complete => "Wallet generation complete",
            GenerationStage::Failed => "Wallet generation failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationStage::Complete | GenerationStage::Failed)
    }
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status())
    }
}

/// Receives stage transitions while a wallet is generated
pub trait ProgressObserver {
    fn on_stage(&mut self, stage: GenerationStage);

    /// Called after `on_stage(Failed)` with the error about to be returned
    fn on_failure(&mut self, _error: &WalletError) {}
}

impl<F: FnMut(GenerationStage)> ProgressObserver for F {
    fn on_stage(&mut self, stage: GenerationStage) {
        self(stage)
    }
}

/// Generates one wallet per call, reporting progress to an optional observer
pub struct WalletGenerator<'a> {
    strength: u32,
    passphrase: String,
    observer: Option<Box<dyn ProgressObserver + 'a>>,
}

impl<'a> WalletGenerator<'a> {
    /// Generator drawing `strength` bits of entropy per wallet
    pub fn new(strength: u32) -> Result<Self> {
        check_strength(strength)?;

        Ok(Self {
            strength,
            passphrase: String::new(),
            observer: None,
        })
    }

    /// BIP-39 passphrase mixed into the seed (empty by default)
    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = passphrase.into();
        self
    }

    pub fn with_observer(mut self, observer: impl ProgressObserver + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn strength(&self) -> u32 {
        self.strength
    }

    /// Generate a wallet from fresh OS entropy
    pub fn generate(&mut self) -> Result<WalletRecord> {
        let entropy = generate_entropy(self.strength)?;
        self.generate_from_entropy(&entropy)
    }

    /// Generate the wallet determined by `entropy`
    ///
    /// The entropy length must be one of the accepted strengths but does not
    /// have to match the strength this generator was built with.
    pub fn generate_from_entropy(&mut self, entropy: &[u8]) -> Result<WalletRecord> {
        match self.run(entropy) {
            Ok(record) => {
                info!("wallet generated: {}", record.address());
                Ok(record)
            }
            Err(e) => {
                error!("wallet generation failed: {}", e);
                if let Some(observer) = self.observer.as_mut() {
                    observer.on_stage(GenerationStage::Failed);
                    observer.on_failure(&e);
                }
                Err(e)
            }
        }
    }

    fn run(&mut self, entropy: &[u8]) -> Result<WalletRecord> {
        check_strength(entropy.len() as u32 * 8)?;
        self.advance(GenerationStage::EntropyGenerated);

        let mnemonic = entropy_to_mnemonic(entropy)?;
        self.advance(GenerationStage::MnemonicCreated);

        let seed = mnemonic.to_seed(&self.passphrase);
        self.advance(GenerationStage::SeedDerived);

        let master = ExtendedKey::master(seed.as_bytes());
        self.advance(GenerationStage::MasterKeyDerived);

        let keypair = KeyPair::from(&master);
        self.advance(GenerationStage::KeyPairCreated);

        let address = keypair.address();
        self.advance(GenerationStage::AddressGenerated);

        if !address.is_valid() {
            return Err(WalletError::InvalidAddressFormat(address.into_string()));
        }
        self.advance(GenerationStage::AddressValidated);

        let report = keypair.self_test();
        if !report.valid {
            return Err(WalletError::SignatureSelfTestFailed);
        }
        self.advance(GenerationStage::SelfTestPassed);

        let record = WalletRecord::new(entropy, &mnemonic, &seed, &master, &keypair, &report);
        self.advance(GenerationStage::Complete);

        Ok(record)
    }

    fn advance(&mut self, stage: GenerationStage) {
        debug!("wallet generation: {}", stage);
        if let Some(observer) = self.observer.as_mut() {
            observer.on_stage(stage);
        }
    }
}

impl fmt::Debug for WalletGenerator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletGenerator")
            .field("strength", &self.strength)
            .field("observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_strength() {
        for strength in [0, 100, 129, 512] {
            assert!(matches!(
                WalletGenerator::new(strength),
                Err(WalletError::InvalidEntropyStrength(s)) if s == strength
            ));
        }
    }

    #[test]
    fn test_stage_order_on_success() {
        let mut stages = Vec::new();
        let record = WalletGenerator::new(128)
            .unwrap()
            .with_observer(|stage: GenerationStage| stages.push(stage))
            .generate_from_entropy(&[0u8; 16])
            .unwrap();

        assert_eq!(stages, GenerationStage::SUCCESS_PATH.to_vec());
        assert_eq!(record.address(), "octCRus1yKzZbQoABuUhWQzcps8KhdqqQWxPzGciLgY698h");
    }

    #[test]
    fn test_short_address_fails_generation() {
        // the identity address for this entropy has only 43 base58 digits
        let mut stages = Vec::new();
        let result = WalletGenerator::new(128)
            .unwrap()
            .with_observer(|stage: GenerationStage| stages.push(stage))
            .generate_from_entropy(&[27u8; 16]);

        match result {
            Err(WalletError::InvalidAddressFormat(address)) => {
                assert_eq!(address, "octabUgZ1dAyFbRfCgcnGXgwHtVqAxEkWWSDN8Pg69pTTg");
            }
            other => panic!("Expected InvalidAddressFormat, got {:?}", other),
        }
        assert_eq!(stages.last(), Some(&GenerationStage::Failed));
        assert!(!stages.contains(&GenerationStage::AddressValidated));
        assert!(!stages.contains(&GenerationStage::Complete));
    }

    #[test]
    fn test_bad_entropy_length_fails_before_any_stage() {
        let mut stages = Vec::new();
        let result = WalletGenerator::new(128)
            .unwrap()
            .with_observer(|stage: GenerationStage| stages.push(stage))
            .generate_from_entropy(&[1u8; 10]);

        assert!(matches!(result, Err(WalletError::InvalidEntropyStrength(80))));
        assert_eq!(stages, vec![GenerationStage::Failed]);
    }

    #[test]
    fn test_failure_observer_receives_error() {
        struct Recorder {
            stages: usize,
            failure: Option<String>,
        }

        impl ProgressObserver for &mut Recorder {
            fn on_stage(&mut self, _stage: GenerationStage) {
                self.stages += 1;
            }

            fn on_failure(&mut self, error: &WalletError) {
                self.failure = Some(error.to_string());
            }
        }

        let mut recorder = Recorder {
            stages: 0,
            failure: None,
        };
        let _ = WalletGenerator::new(128)
            .unwrap()
            .with_observer(&mut recorder)
            .generate_from_entropy(&[27u8; 16]);

        assert_eq!(recorder.stages, 7);
        assert!(recorder.failure.unwrap().starts_with("Invalid address format"));
    }

    #[test]
    fn test_random_generation_is_fresh() {
        let mut generator = WalletGenerator::new(128).unwrap();
        let mut addresses = Vec::new();
        // about 1 in 20 identity keys hash to a short address
        for _ in 0..8 {
            if let Ok(record) = generator.generate() {
                assert!(record.signature_valid());
                assert_eq!(record.mnemonic().len(), 12);
                addresses.push(record.address().to_string());
            }
        }
        addresses.dedup();
        assert!(addresses.len() > 1);
    }

    #[test]
    fn test_passphrase_changes_wallet() {
        let plain = WalletGenerator::new(128)
            .unwrap()
            .generate_from_entropy(&[0x7f; 16])
            .unwrap();
        let salted = WalletGenerator::new(128)
            .unwrap()
            .with_passphrase("TREZOR")
            .generate_from_entropy(&[0x7f; 16]);

        // salted generation may also land on a short address; only compare on success
        if let Ok(salted) = salted {
            assert_ne!(plain.address(), salted.address());
            assert_eq!(plain.mnemonic(), salted.mnemonic());
        }
    }

    #[test]
    fn test_stage_status_text() {
        assert_eq!(GenerationStage::EntropyGenerated.to_string(), "Entropy generated");
        assert!(GenerationStage::Failed.is_terminal());
        assert!(!GenerationStage::SeedDerived.is_terminal());
    }
}
