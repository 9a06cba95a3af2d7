//! Network derivation paths
//!
//! Every Octra key below the master key lives at an eight-level path:
//!
//! ```text
//! 345' / coin_type' / network' / contract' / account' / token' / subnet' / index
//! ```
//!
//! The first seven levels are always hardened, whatever the caller passes in.
//! The leaf index is used exactly as given, so it is only hardened if the caller
//! set the high bit themselves.

use log::debug;
use octra_crypto::{Address, ChainCode, ChildIndex, DerivationPath, ExtendedKey, KeyPair};
use serde::{Deserialize, Serialize};

use crate::mnemonic::Seed;

/// Purpose level of every Octra path
pub const PURPOSE: u32 = 345;

/// Human readable name of a network type
pub fn network_type_name(network_type: u32) -> String {
    match network_type {
        0 => "MainCoin".to_string(),
        1 => format!("SubCoin {}", network_type),
        2 => format!("Contract {}", network_type),
        3 => format!("Subnet {}", network_type),
        4 => format!("Account {}", network_type),
        _ => format!("Unknown {}", network_type),
    }
}

/// Inputs of the eight-level derivation path; every field defaults to 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkPath {
    pub network_type: u32,
    pub network: u32,
    pub contract: u32,
    pub account: u32,
    pub token: u32,
    pub subnet: u32,
    pub index: u32,
}

impl NetworkPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn network_type(mut self, network_type: u32) -> Self {
        self.network_type = network_type;
        self
    }

    pub fn network(mut self, network: u32) -> Self {
        self.network = network;
        self
    }

    pub fn contract(mut self, contract: u32) -> Self {
        self.contract = contract;
        self
    }

    pub fn account(mut self, account: u32) -> Self {
        self.account = account;
        self
    }

    pub fn token(mut self, token: u32) -> Self {
        self.token = token;
        self
    }

    pub fn subnet(mut self, subnet: u32) -> Self {
        self.subnet = subnet;
        self
    }

    pub fn index(mut self, index: u32) -> Self {
        self.index = index;
        self
    }

    /// Coin type level; the network type number is used directly
    pub fn coin_type(&self) -> u32 {
        self.network_type
    }

    pub fn to_derivation_path(&self) -> DerivationPath {
        let hardened = [
            PURPOSE,
            self.coin_type(),
            self.network,
            self.contract,
            self.account,
            self.token,
            self.subnet,
        ];

        hardened
            .into_iter()
            .map(ChildIndex::hardened)
            .chain(std::iter::once(ChildIndex::new(self.index)))
            .collect()
    }
}

/// Key, address and path produced by [`derive_for_network`]
#[derive(Debug, Clone)]
pub struct NetworkDerivation {
    pub key: ExtendedKey,
    pub keypair: KeyPair,
    pub address: Address,
    pub path: DerivationPath,
    pub network_type_name: String,
    pub inputs: NetworkPath,
}

impl NetworkDerivation {
    pub fn private_key(&self) -> &[u8; 32] {
        self.key.private_key()
    }

    pub fn chain_code(&self) -> &ChainCode {
        self.key.chain_code()
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.keypair.public_key_bytes()
    }
}

/// Derive the key pair and address at `inputs` below the master key of `seed`
///
/// The address is returned as encoded; it is not run through the shape check.
pub fn derive_for_network(seed: &Seed, inputs: &NetworkPath) -> NetworkDerivation {
    let path = inputs.to_derivation_path();
    let key = ExtendedKey::master(seed.as_bytes()).derive_path(&path);
    let keypair = KeyPair::from(&key);
    let address = keypair.address();

    debug!("derived {} at {}", address, path);

    NetworkDerivation {
        key,
        keypair,
        address,
        path,
        network_type_name: network_type_name(inputs.network_type),
        inputs: *inputs,
    }
}
