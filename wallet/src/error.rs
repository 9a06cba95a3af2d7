use octra_crypto::CryptoError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WalletError>;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Invalid entropy strength: {0} bits (must be 128, 160, 192, 224 or 256)")]
    InvalidEntropyStrength(u32),

    #[error("Malformed seed: {0}")]
    MalformedSeed(String),

    #[error("Invalid mnemonic phrase: {0}")]
    Mnemonic(String),

    #[error("Signature self-test failed")]
    SignatureSelfTestFailed,

    #[error("Invalid address format generated: {0}")]
    InvalidAddressFormat(String),

    #[error("Malformed derive request: {0}")]
    MalformedDeriveRequest(String),

    #[error("Wallet record does not match its mnemonic: {0}")]
    RecordMismatch(&'static str),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<bip39::Error> for WalletError {
    fn from(e: bip39::Error) -> Self {
        WalletError::Mnemonic(e.to_string())
    }
}
