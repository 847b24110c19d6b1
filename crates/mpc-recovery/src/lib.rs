//! # MPC Recovery
//!
//! Rebuilds the private keys of an MPC custodial wallet without the live
//! signing service.
//!
//! A run takes the user's mnemonic, the custodian's ECIES and RSA keys and
//! the encrypted backup archive:
//!
//! 1. The mnemonic gives the user's root share and its public key.
//! 2. The archive is searched for the record sealed for that public key,
//!    which yields the two custodian root shares.
//! 3. The three shares are assembled and every requested `(vault, chain)`
//!    child key is derived share by share, then summed.

pub mod error;
pub mod input;
pub mod output;

use std::fs;
use std::path::PathBuf;

use mpc_recovery_backup::{BackupResolver, EciesLayer, RsaOaepLayer};
use mpc_recovery_ckd::derive_all;
use mpc_recovery_core::{assemble, user_share_from_mnemonic};

pub use error::{ErrorKind, Lang, RecoveryError};
pub use input::{InputError, RecoveryInput};
pub use mpc_recovery_ckd::DeriveResult;
pub use output::{OutputFormat, RecoveryReport};

/// Run a full recovery, reading the archive named by `input.zip_path`.
pub fn recover_keys(input: &RecoveryInput) -> Result<Vec<DeriveResult>, RecoveryError> {
    input.validate()?;
    let path = PathBuf::from(input.zip_path.trim());
    let archive = fs::read(&path).map_err(|source| RecoveryError::ReadArchive {
        path: path.clone(),
        source,
    })?;
    log::info!("loaded backup archive {} ({} bytes)", path.display(), archive.len());
    recover_keys_from_archive(input, &archive)
}

/// Run a full recovery against archive bytes already in memory.
///
/// Keys are checked in the order mnemonic, ECIES key, RSA key so that the
/// reported error names the first bad credential.
pub fn recover_keys_from_archive(
    input: &RecoveryInput,
    archive: &[u8],
) -> Result<Vec<DeriveResult>, RecoveryError> {
    let chains = input.validate()?;
    let vault_count = input.vault_count()?;

    let user_share = user_share_from_mnemonic(&input.user_mnemonic)?;
    let user_pubkey = user_share.secp256k1_pubkey_hex();
    log::info!("user public key {}", user_pubkey);

    let ecies = EciesLayer::from_hex(&input.ecies_private_key)?;
    let rsa = RsaOaepLayer::from_key_str(&input.rsa_private_key)?;

    let [hbc_share0, hbc_share1] =
        BackupResolver::new(rsa, ecies).locate_shares(archive, &user_pubkey)?;

    let keys = assemble(hbc_share0, hbc_share1, user_share)?;
    log::debug!(
        "aggregate ed25519 key {}",
        hex::encode(keys.ed25519_aggregate().to_bytes())
    );

    let results = derive_all(&keys, vault_count, &chains)?;
    log::info!("recovered {} key(s)", results.len());
    Ok(results)
}
