//! Derive an address for a network from a hex seed
//!
//! JSON in, JSON out; the CLI `derive` command is a thin shell around this.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WalletError};
use crate::mnemonic::Seed;
use crate::path::{derive_for_network, NetworkPath};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeriveRequest {
    #[serde(default)]
    pub seed_hex: Option<String>,
    #[serde(default)]
    pub network_type: u32,
    #[serde(default)]
    pub index: u32,
}

impl DeriveRequest {
    pub fn new(seed_hex: impl Into<String>) -> Self {
        Self {
            seed_hex: Some(seed_hex.into()),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| WalletError::MalformedDeriveRequest(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeriveResponse {
    pub address: String,
    pub path: String,
    pub network_type_name: String,
}

/// Derive the address at `345'/network_type'/0'/0'/0'/0'/0'/index`
pub fn derive(request: &DeriveRequest) -> Result<DeriveResponse> {
    let seed_hex = match request.seed_hex.as_deref() {
        Some(seed_hex) if !seed_hex.is_empty() => seed_hex,
        _ => {
            return Err(WalletError::MalformedDeriveRequest(
                "seed_hex is required".to_string(),
            ))
        }
    };
    let seed = Seed::from_hex(seed_hex)?;

    let inputs = NetworkPath::new()
        .network_type(request.network_type)
        .index(request.index);
    let derived = derive_for_network(&seed, &inputs);

    Ok(DeriveResponse {
        address: derived.address.into_string(),
        path: derived.path.to_string(),
        network_type_name: derived.network_type_name,
    })
}
