use wallet::{derive_for_network, mnemonic_to_seed, GenerationStage, NetworkPath, WalletGenerator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Octra Wallet Example ===\n");

    // Generate a new wallet, printing each stage as it completes
    println!("Generating new wallet...");
    let record = WalletGenerator::new(128)?
        .with_observer(|stage: GenerationStage| println!("  {}", stage))
        .generate()?;

    println!("\n✓ Wallet generated!");
    println!("  Address: {}", record.address());
    println!("  Mnemonic: {}", record.mnemonic_phrase());
    println!("  Public key: {}\n", record.public_key_b64());

    // Recover the seed from the mnemonic and derive a few sub-addresses
    println!("Deriving addresses from the mnemonic...");
    let seed = mnemonic_to_seed(&record.mnemonic_phrase(), "")?;
    for index in 0..3 {
        let derived = derive_for_network(&seed, &NetworkPath::new().index(index));
        println!("  {} -> {}", derived.path, derived.address);
    }

    let derived = derive_for_network(&seed, &NetworkPath::new().network_type(1).account(2));
    println!("  {} ({}) -> {}\n", derived.path, derived.network_type_name, derived.address);

    // Save the record and load it back
    let wallet_file = std::env::temp_dir().join("octra_example_wallet.json");
    println!("Saving wallet to file...");
    record.save_to_file(&wallet_file)?;
    println!("✓ Wallet saved to: {}\n", wallet_file.display());

    println!("Loading wallet from file...");
    let loaded = wallet::WalletRecord::load_from_file(&wallet_file)?;
    loaded.verify("")?;
    println!("✓ Wallet loaded and verified!");
    println!("  Address matches: {}\n", loaded.address() == record.address());

    std::fs::remove_file(&wallet_file)?;
    println!("=== Example Complete ===");

    Ok(())
}
