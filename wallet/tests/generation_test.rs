use chrono::{TimeZone, Utc};
use octra_crypto::{validate_address, ExtendedKey, KeyPair};
use wallet::{
    derive, derive_for_network, entropy_to_mnemonic, mnemonic_to_seed, DeriveRequest,
    GenerationStage, NetworkPath, WalletError, WalletGenerator, WalletRecord,
};

const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_end_to_end_zero_entropy() {
    init_logging();

    let mut stages = Vec::new();
    let record = WalletGenerator::new(128)
        .unwrap()
        .with_observer(|stage: GenerationStage| stages.push(stage))
        .generate_from_entropy(&[0u8; 16])
        .unwrap();

    assert_eq!(stages, GenerationStage::SUCCESS_PATH.to_vec());
    assert_eq!(record.mnemonic_phrase(), ABANDON);
    assert_eq!(
        record.seed_hex(),
        "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc1\
         9a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
    );
    assert_eq!(
        record.public_key_hex(),
        "f7801589b04dfccf79c16bb59684d8ed7574fcc77413fa7b23a0b57e38765a97"
    );
    assert_eq!(record.address(), "octCRus1yKzZbQoABuUhWQzcps8KhdqqQWxPzGciLgY698h");
    assert!(validate_address(record.address()));
}

#[test]
fn test_record_matches_manual_derivation() {
    let record = WalletGenerator::new(128)
        .unwrap()
        .generate_from_entropy(&[0x7f; 16])
        .unwrap();

    let phrase = entropy_to_mnemonic(&[0x7f; 16]).unwrap();
    let seed = phrase.to_seed("");
    let keypair = KeyPair::from(&ExtendedKey::master(seed.as_bytes()));

    assert_eq!(record.seed_hex(), seed.to_hex());
    assert_eq!(record.private_key_hex(), keypair.private_key_hex());
    assert_eq!(record.address(), "oct3GBRtDotUv7GyXdGChTqnuD3Nh1v7swvTRiVs9bMtjRm");
    assert_eq!(record.address(), keypair.address().as_str());
}

#[test]
fn test_derive_request_matches_network_derivation() {
    let record = WalletGenerator::new(128)
        .unwrap()
        .generate_from_entropy(&[0u8; 16])
        .unwrap();

    let request = DeriveRequest {
        seed_hex: Some(record.seed_hex().to_string()),
        network_type: 0,
        index: 1,
    };
    let response = derive(&request).unwrap();

    let seed = mnemonic_to_seed(ABANDON, "").unwrap();
    let derived = derive_for_network(&seed, &NetworkPath::new().index(1));

    assert_eq!(response.address, derived.address.as_str());
    assert_eq!(response.path, derived.path.to_string());
    // the identity key sits at the master node, not on the network path
    assert_ne!(response.address, record.address());
}

#[test]
fn test_every_strength_generates() {
    for (strength, words) in [(128, 12), (160, 15), (192, 18), (224, 21), (256, 24)] {
        let mut generator = WalletGenerator::new(strength).unwrap();
        let record = (0..10)
            .find_map(|_| generator.generate().ok())
            .expect("no valid wallet in 10 attempts");
        assert_eq!(record.mnemonic().len(), words);
        assert_eq!(record.entropy_hex().len(), strength as usize / 4);
        assert!(record.verify("").is_ok());
    }
}

#[test]
fn test_short_address_is_reported() {
    let result = WalletGenerator::new(128)
        .unwrap()
        .generate_from_entropy(&[27u8; 16]);
    assert!(matches!(result, Err(WalletError::InvalidAddressFormat(_))));
}

#[test]
fn test_export_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let record = WalletGenerator::new(256)
        .unwrap()
        .generate_from_entropy(&[0u8; 32])
        .unwrap();
    assert_eq!(record.address(), "oct3VAcjZNfhx9xstZRM8upyEYGYJ5BZ4c7bn2fevDxCimW");

    let generated_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let document = record.write_export(dir.path(), generated_at).unwrap();
    let contents = std::fs::read_to_string(&document).unwrap();
    assert!(contents.starts_with("OCTRA WALLET\n"));
    assert!(contents.contains("Generated: 2024-06-01 12:00:00\n"));
    assert!(contents.contains(&format!("Entropy: {}\n", record.entropy_hex())));

    let json = dir.path().join("record.json");
    record.save_to_file(&json).unwrap();
    let loaded = WalletRecord::load_from_file(&json).unwrap();
    assert_eq!(loaded, record);
}
