//! MPC Recovery Backup
//!
//! Locates the custodian's two root key shares inside an encrypted backup
//! archive.
//!
//! # Archive Layout
//!
//! The archive is a zip of JSON records, one per team. Each record carries
//! two custodian shares, their chain codes and the public key of the user
//! share they pair with, all sealed as `hex(RSA-OAEP(ECIES(plaintext)))`.
//!
//! The resolver decrypts each record's user public key in archive order and
//! returns the shares of the first record that matches the user's mnemonic.

pub mod archive;
pub mod ecies;
pub mod pipeline;
pub mod record;
pub mod rsa_oaep;

use std::io::Cursor;

use bitcoin::hashes::cmp::fixed_time_eq;
use mpc_recovery_core::RootKeyShare;
use thiserror::Error;

pub use ecies::EciesLayer;
pub use pipeline::{CipherError, CipherLayer, DecryptPipeline, Layer};
pub use record::EncryptedShareRecord;
pub use rsa_oaep::{RsaOaepLayer, OAEP_LABEL};

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("ECIES private key is empty")]
    EmptyEciesKey,
    #[error("Invalid ECIES private key: {0}")]
    InvalidEciesKey(String),
    #[error("RSA private key is empty")]
    EmptyRsaKey,
    #[error("Invalid RSA private key: {0}")]
    InvalidRsaKey(String),
    #[error("Invalid user public key: {0}")]
    InvalidUserKey(String),
    #[error("Cannot read backup archive: {0}")]
    Archive(String),
    #[error("Malformed backup record {entry}: {reason}")]
    MalformedRecord { entry: String, reason: String },
    #[error("Malformed backup field {field}: {reason}")]
    MalformedField { field: String, reason: String },
    #[error("{layer} decryption of {field} failed: {source}")]
    Decryption {
        layer: Layer,
        field: String,
        source: CipherError,
    },
    #[error("{layer} encryption failed: {source}")]
    Encryption { layer: Layer, source: CipherError },
    #[error("No backup record matches the user's mnemonic")]
    NoMatchingBackup,
}

/// Searches backup archives with one custodian key pair.
pub struct BackupResolver {
    pipeline: DecryptPipeline,
}

impl BackupResolver {
    pub fn new(rsa: RsaOaepLayer, ecies: EciesLayer) -> Self {
        Self::with_pipeline(DecryptPipeline::new(rsa, ecies))
    }

    pub fn with_pipeline(pipeline: DecryptPipeline) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &DecryptPipeline {
        &self.pipeline
    }

    /// Return the two custodian shares of the first record whose decrypted
    /// user public key equals `user_pubkey_hex`.
    ///
    /// Stops at the first malformed record or decryption failure.
    pub fn locate_shares(
        &self,
        archive_bytes: &[u8],
        user_pubkey_hex: &str,
    ) -> Result<[RootKeyShare; 2], BackupError> {
        let expected = hex::decode(user_pubkey_hex.trim())
            .map_err(|e| BackupError::InvalidUserKey(e.to_string()))?;
        if expected.is_empty() {
            return Err(BackupError::InvalidUserKey("empty".into()));
        }

        let found = archive::find_entry(Cursor::new(archive_bytes), |entry, contents| {
            let record = EncryptedShareRecord::from_json(entry, contents)?;
            let user_pubkey = self.pipeline.open_hex("user_pub_key", &record.user_pub_key)?;

            if user_pubkey.len() != expected.len() || !fixed_time_eq(&user_pubkey, &expected) {
                log::debug!("Backup entry {} belongs to another user", entry);
                return Ok(None);
            }

            log::info!("Backup entry {} matches the user public key", entry);
            let share0 = record.open_share(entry, 0, &self.pipeline)?;
            let share1 = record.open_share(entry, 1, &self.pipeline)?;
            Ok(Some([share0, share1]))
        })?;

        found.ok_or(BackupError::NoMatchingBackup)
    }
}

/// Parse both custodian keys (ECIES first) and search `archive_bytes`.
pub fn locate_shares(
    archive_bytes: &[u8],
    user_pubkey_hex: &str,
    ecies_private_key_hex: &str,
    rsa_private_key: &str,
) -> Result<[RootKeyShare; 2], BackupError> {
    let ecies = EciesLayer::from_hex(ecies_private_key_hex)?;
    let rsa = RsaOaepLayer::from_key_str(rsa_private_key)?;
    BackupResolver::new(rsa, ecies).locate_shares(archive_bytes, user_pubkey_hex)
}
