//! Octra Wallet Generator
//!
//! Builds on `octra-crypto` to turn entropy into a complete wallet:
//! - BIP-39 mnemonic and seed handling
//! - network/contract/account derivation paths
//! - a staged generator that self-tests the identity key before handing it out
//! - the exportable wallet record and its plain-text document

pub mod derive;
pub mod error;
pub mod generator;
pub mod mnemonic;
pub mod path;
pub mod record;

pub use derive::{derive, DeriveRequest, DeriveResponse};
pub use error::{Result, WalletError};
pub use generator::{GenerationStage, ProgressObserver, WalletGenerator};
pub use mnemonic::{
    entropy_to_mnemonic, generate_entropy, mnemonic_to_seed, validate_mnemonic, MnemonicPhrase,
    Seed, ENTROPY_STRENGTHS, SEED_LENGTH,
};
pub use path::{derive_for_network, network_type_name, NetworkDerivation, NetworkPath, PURPOSE};
pub use record::WalletRecord;
