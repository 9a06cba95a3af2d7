//! Octra wallet generator CLI

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use log::info;
use octra_crypto::validate_address;
use owo_colors::OwoColorize;
use serde_json::json;
use wallet::{derive, DeriveRequest, GenerationStage, WalletGenerator, WalletRecord};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "octra-wallet")]
#[command(about = "Octra HD wallet generator", version)]
#[command(long_version = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    " ",
    env!("GIT_BRANCH"),
    ")"
))]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new wallet
    Generate {
        /// Entropy strength in bits (128, 160, 192, 224 or 256)
        #[arg(short, long)]
        strength: Option<u32>,

        /// BIP-39 passphrase
        #[arg(short, long)]
        passphrase: Option<String>,

        /// Directory for the wallet document
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,

        /// Print the wallet record as JSON
        #[arg(long)]
        json: bool,

        /// Do not write the wallet document
        #[arg(long)]
        no_save: bool,
    },

    /// Derive an address from a seed
    Derive {
        /// JSON request: {"seed_hex": ..., "network_type": 0, "index": 0}
        request: Option<String>,

        /// 64-byte seed as hex
        #[arg(long, conflicts_with = "request")]
        seed_hex: Option<String>,

        #[arg(long, conflicts_with = "request")]
        network_type: Option<u32>,

        #[arg(long, default_value = "0", conflicts_with = "request")]
        index: u32,
    },

    /// Write the document for a wallet record given as JSON
    Save {
        /// Wallet record JSON
        record: String,

        /// Passphrase the record was generated with
        #[arg(short, long)]
        passphrase: Option<String>,

        /// Directory for the wallet document
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// Check whether an address is well formed
    Validate {
        address: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate {
            strength,
            passphrase,
            out,
            json,
            no_save,
        } => {
            let strength = strength.unwrap_or(config.generation.strength);
            let passphrase = passphrase.unwrap_or_else(|| config.generation.passphrase.clone());
            let out = out.unwrap_or_else(|| config.output_dir());
            generate(strength, passphrase, (!no_save).then_some(out.as_path()), json)
        }

        Commands::Derive {
            request,
            seed_hex,
            network_type,
            index,
        } => {
            let request = match request {
                Some(json) => DeriveRequest::from_json(&json)?,
                None => DeriveRequest {
                    seed_hex,
                    network_type: network_type.unwrap_or(config.derive.network_type),
                    index,
                },
            };
            let response = derive(&request)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }

        Commands::Save {
            record,
            passphrase,
            out,
        } => {
            let passphrase = passphrase.unwrap_or_else(|| config.generation.passphrase.clone());
            let out = out.unwrap_or_else(|| config.output_dir());

            match save(&record, &passphrase, &out) {
                Ok((path, content)) => {
                    let response = json!({
                        "success": true,
                        "filename": path.display().to_string(),
                        "content": content,
                    });
                    println!("{}", serde_json::to_string_pretty(&response)?);
                    Ok(())
                }
                Err(e) => {
                    let response = json!({
                        "success": false,
                        "error": format!("{:#}", e),
                    });
                    println!("{}", serde_json::to_string_pretty(&response)?);
                    std::process::exit(1);
                }
            }
        }

        Commands::Validate { address } => {
            if validate_address(&address) {
                println!("{} {}", "✓".green(), address);
            } else {
                println!("{} {} is not a valid Octra address", "✗".red(), address);
            }
            Ok(())
        }
    }
}

fn generate(strength: u32, passphrase: String, out: Option<&Path>, json: bool) -> Result<()> {
    let mut generator = WalletGenerator::new(strength)?.with_passphrase(passphrase);
    if !json {
        generator = generator.with_observer(|stage: GenerationStage| {
            if stage != GenerationStage::Failed {
                println!("{} {}", "✓".green(), stage);
            }
        });
    }

    let record = generator.generate().context("Wallet generation failed")?;

    let saved = match out {
        Some(dir) => Some(write_document(&record, dir, Utc::now())?),
        None => None,
    };

    if json {
        println!("{}", record.to_json_pretty()?);
        return Ok(());
    }

    println!("\n{}", "OCTRA WALLET".cyan().bold());
    println!("{}", "═".repeat(50).bright_black());
    println!("{}: {}", "Address".yellow().bold(), record.address().bright_blue());
    println!("{}: {}", "Mnemonic".yellow().bold(), record.mnemonic_phrase());
    println!("{}: {}", "Public Key (B64)".yellow().bold(), record.public_key_b64());
    println!("{}: {}", "Private Key (B64)".yellow().bold(), record.private_key_b64());
    if let Some(path) = saved {
        println!("\n{} {}", "Saved to".green(), path.display());
    }
    println!("\n{}", "⚠ Keep the mnemonic and private key secret".yellow());
    Ok(())
}

fn save(record_json: &str, passphrase: &str, dir: &Path) -> Result<(PathBuf, String)> {
    let record = WalletRecord::from_json(record_json).context("Invalid wallet record")?;
    record
        .verify(passphrase)
        .context("Wallet record failed verification")?;

    let generated_at = Utc::now();
    let path = write_document(&record, dir, generated_at)?;
    Ok((path, record.export_document(generated_at)))
}

fn write_document(record: &WalletRecord, dir: &Path, generated_at: DateTime<Utc>) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = record
        .write_export(dir, generated_at)
        .with_context(|| format!("Failed to write wallet document to {}", dir.display()))?;
    info!("Wallet document written to {}", path.display());
    Ok(path)
}
