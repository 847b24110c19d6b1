//! End-to-end recovery tests.
//!
//! Runs the complete flow (mnemonic, archive search, two-layer decryption,
//! assembly, per-share derivation, output) against a backup archive sealed
//! by an independent implementation, plus archives sealed in-process.
//!
//! Run with: cargo test --test recovery_e2e

use mpc_recovery::output::{self, OutputFormat};
use mpc_recovery::{recover_keys, recover_keys_from_archive, DeriveResult, RecoveryInput};
use mpc_recovery_backup::archive::build_archive;
use mpc_recovery_backup::{DecryptPipeline, EciesLayer, EncryptedShareRecord, RsaOaepLayer};
use mpc_recovery_ckd::derive_all;
use mpc_recovery_core::{assemble, user_share_from_mnemonic, ChainCode, RootKeyShare, ShareScalar};
use sha2::{Digest, Sha256};
use std::fs;

const FIXTURE_ARCHIVE: &[u8] = include_bytes!("../../testdata/backup_archive.zip");
const RSA_PEM: &str = include_str!("../../testdata/rsa_test_key.pem");
const ECIES_KEY: &str = "ea5db436b7508e5c8ec3ae17003bcb997c30e03c655f0dd2d1824ec93bd0501c";
const MNEMONIC: &str = "amused garlic window please enrich sick gate ready owner giraffe elite \
                        umbrella hair seat punch seminar notable enroll wet asset outdoor \
                        inflict rich mushroom";

fn input(chains: &[&str], vault_count: i64) -> RecoveryInput {
    RecoveryInput {
        zip_path: "backup.zip".into(),
        user_mnemonic: MNEMONIC.into(),
        ecies_private_key: ECIES_KEY.into(),
        rsa_private_key: RSA_PEM.into(),
        vault_count,
        chains: chains.iter().map(|c| c.to_string()).collect(),
    }
}

fn share(label: &str) -> RootKeyShare {
    let scalar: [u8; 32] = Sha256::digest(format!("share-{}", label)).into();
    let chain: [u8; 32] = Sha256::digest(format!("chain-{}", label)).into();
    RootKeyShare::new(ShareScalar::from_bytes(scalar), ChainCode(chain)).unwrap()
}

fn pipeline() -> DecryptPipeline {
    DecryptPipeline::new(
        RsaOaepLayer::from_key_str(RSA_PEM).unwrap(),
        EciesLayer::from_hex(ECIES_KEY).unwrap(),
    )
}

fn sealed_record(user_pubkey_hex: &str, shares: [&RootKeyShare; 2]) -> Vec<u8> {
    let user_pubkey = hex::decode(user_pubkey_hex).unwrap();
    EncryptedShareRecord::seal(&pipeline(), &user_pubkey, shares)
        .unwrap()
        .to_json()
        .unwrap()
}

fn expected(vault_index: u32, chain: &str, address: &str, private_key: &str) -> DeriveResult {
    DeriveResult {
        vault_index,
        chain: chain.into(),
        address: address.into(),
        private_key: private_key.into(),
    }
}

// ============================================================================
// Fixture archive
// ============================================================================

#[test]
fn test_fixture_archive_known_vectors() {
    let results =
        recover_keys_from_archive(&input(&["Solana", "Bitcoin"], 2), FIXTURE_ARCHIVE).unwrap();

    assert_eq!(
        results,
        vec![
            expected(
                1,
                "Bitcoin",
                "1Hq7SsFz7q6G8LP8cryVnJToS1t47gDLix",
                "L1Zbn87cS2hjdzR3smuvNP7aaK9UNGzUBHDeDqfW4X4B9Kv1ttQ4",
            ),
            expected(
                1,
                "Solana",
                "5cussy8MBMLdfTWh6vThj19Yk5kAHMz3QkeUTMw7B6i3",
                "08ba2f56a125a393f3d68b8452c498fa7e15aa62aa7ff86d5a3cd88029c99018",
            ),
            expected(
                2,
                "Bitcoin",
                "1ERdm46JoZTBh178kDUhDCNCSoFd45daQr",
                "L2gQqqf4pGZUJFgJvwz9RouTCVwznTB2zU11daAnQCCV3eAa61Q6",
            ),
            expected(
                2,
                "Solana",
                "Frk8iLdCesRubHa22aMEh9NXzsRaJRBePTdz9buRpo7J",
                "0a845ca1386928dffddb95c1070236675f0e1ee861bd24a002ec013608b98920",
            ),
        ]
    );
}

#[test]
fn test_recovery_is_deterministic() {
    let chains = ["eth", "trx", "dot", "sol", "apt", "ton", "doge", "ltc", "bch"];
    let a = recover_keys_from_archive(&input(&chains, 3), FIXTURE_ARCHIVE).unwrap();
    let b = recover_keys_from_archive(&input(&chains, 3), FIXTURE_ARCHIVE).unwrap();
    assert_eq!(a.len(), chains.len() * 3);
    assert_eq!(a, b);
}

#[test]
fn test_results_ordered_by_vault_then_chain() {
    let results = recover_keys_from_archive(&input(&["sol", "dot"], 2), FIXTURE_ARCHIVE).unwrap();
    let order: Vec<(u32, &str)> = results
        .iter()
        .map(|r| (r.vault_index, r.chain.as_str()))
        .collect();
    assert_eq!(order, vec![(1, "dot"), (1, "sol"), (2, "dot"), (2, "sol")]);
}

#[test]
fn test_recover_from_files_and_write_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let archive_path = dir.path().join("backup.zip");
    fs::write(&archive_path, FIXTURE_ARCHIVE).unwrap();

    // RSA key given hex-encoded, vault count under its legacy spelling
    let yaml = format!(
        "zip_path: {}\nuser_mnemonic: \"{}\"\necies_private_key: {}\nrsa_private_key: {}\nvalut_count: 1\nchains: [Bitcoin]\n",
        archive_path.display(),
        MNEMONIC,
        ECIES_KEY,
        hex::encode(RSA_PEM),
    );
    let input_path = dir.path().join("recovery.yaml");
    fs::write(&input_path, yaml).unwrap();

    let recovery_input = RecoveryInput::from_file(&input_path).unwrap();
    let results = recover_keys(&recovery_input).unwrap();

    let output_path = dir.path().join("keys.yaml");
    let rendered = output::render(results, OutputFormat::Yaml).unwrap();
    output::write_atomic(&output_path, rendered.as_bytes()).unwrap();

    let written: Vec<DeriveResult> =
        serde_yaml::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].vault_index, 1);
    assert_eq!(written[0].address, "1Hq7SsFz7q6G8LP8cryVnJToS1t47gDLix");
}

#[test]
fn test_json_report_envelope() {
    let results = recover_keys_from_archive(&input(&["btc"], 1), FIXTURE_ARCHIVE).unwrap();
    let json = output::render(results, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["errMsg"], "");
    assert_eq!(value["data"][0]["chain"], "btc");
    assert_eq!(
        value["data"][0]["address"],
        "1Hq7SsFz7q6G8LP8cryVnJToS1t47gDLix"
    );
}

// ============================================================================
// In-process sealed archives
// ============================================================================

#[test]
fn test_sealed_archive_matches_direct_derivation() {
    let user = user_share_from_mnemonic(MNEMONIC).unwrap();
    let (s0, s1) = (share("custodian-a"), share("custodian-b"));
    let (d0, d1) = (share("decoy-a"), share("decoy-b"));

    let decoy_user = "03".to_string() + &"11".repeat(32);
    let decoy = sealed_record(&decoy_user, [&d0, &d1]);
    let matching = sealed_record(&user.secp256k1_pubkey_hex(), [&s0, &s1]);

    // matching record last, behind two decoys
    let archive = build_archive(&[
        ("team_1.json", decoy.as_slice()),
        ("team_2.json", decoy.as_slice()),
        ("team_3.json", matching.as_slice()),
    ])
    .unwrap();

    let chains = ["eth", "apt", "Bitcoin Cash"];
    let recovered = recover_keys_from_archive(&input(&chains, 2), &archive).unwrap();

    let keys = assemble(s0, s1, user).unwrap();
    let direct = derive_all(&keys, 2, &chains).unwrap();
    assert_eq!(recovered, direct);
}

#[test]
fn test_matching_record_first_is_found() {
    let user = user_share_from_mnemonic(MNEMONIC).unwrap();
    let (s0, s1) = (share("x"), share("y"));
    let matching = sealed_record(&user.secp256k1_pubkey_hex(), [&s0, &s1]);
    let decoy = sealed_record(&("02".to_string() + &"22".repeat(32)), [&s1, &s0]);

    let archive = build_archive(&[("a.json", matching.as_slice()), ("b.json", decoy.as_slice())]).unwrap();
    let recovered = recover_keys_from_archive(&input(&["sol"], 1), &archive).unwrap();

    let keys = assemble(s0, s1, user).unwrap();
    assert_eq!(recovered, derive_all(&keys, 1, &["sol"]).unwrap());
}
