use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Deserialize;

/// Used when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "$HOME/.octra/wallet.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub derive: DeriveConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_strength")]
    pub strength: u32,
    #[serde(default)]
    pub passphrase: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            strength: default_strength(),
            passphrase: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_directory")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeriveConfig {
    #[serde(default)]
    pub network_type: u32,
}

fn default_strength() -> u32 {
    128
}

fn default_directory() -> String {
    ".".to_string()
}

impl Config {
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid wallet config")
    }

    /// Load the config file, falling back to defaults when it does not exist
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(expand_path(DEFAULT_CONFIG_PATH)), false),
        };

        if !path.exists() {
            if explicit {
                warn!("Config file {} not found, using defaults", path.display());
            } else {
                debug!("No config at {}, using defaults", path.display());
            }
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Output directory with `$HOME` expanded
    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(expand_path(&self.output.directory))
    }
}

pub fn expand_path(path: &str) -> String {
    path.replace("$HOME", &std::env::var("HOME").unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let config = Config::from_toml(
            r#"
            [generation]
            strength = 256
            passphrase = "hunter2"

            [output]
            directory = "/var/lib/octra"

            [derive]
            network_type = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.generation.strength, 256);
        assert_eq!(config.generation.passphrase, "hunter2");
        assert_eq!(config.output_dir(), PathBuf::from("/var/lib/octra"));
        assert_eq!(config.derive.network_type, 2);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_toml("[derive]\nnetwork_type = 1\n").unwrap();
        assert_eq!(config.generation, GenerationConfig::default());
        assert_eq!(config.generation.strength, 128);
        assert_eq!(config.output.directory, ".");
        assert_eq!(config.derive.network_type, 1);

        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_config() {
        assert!(Config::from_toml("[generation]\nstrength = \"lots\"\n").is_err());
    }

    #[test]
    fn test_home_expansion() {
        let home = std::env::var("HOME").unwrap_or_default();
        assert_eq!(expand_path("$HOME/wallets"), format!("{}/wallets", home));
        assert_eq!(expand_path("/tmp/wallets"), "/tmp/wallets");
    }

    #[test]
    fn test_load_missing_and_present_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet.toml");
        assert_eq!(Config::load(Some(&path)).unwrap(), Config::default());

        std::fs::write(&path, "[generation]\nstrength = 160\n").unwrap();
        assert_eq!(Config::load(Some(&path)).unwrap().generation.strength, 160);
    }
}
