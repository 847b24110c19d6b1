//! Encrypted share record, one per archive entry
//!
//! ```json
//! {
//!   "hbc_private_keys": ["<hex>", "<hex>"],
//!   "hbc_chain_codes":  ["<hex>", "<hex>"],
//!   "user_pub_key":     "<hex>"
//! }
//! ```
//!
//! Every value is `hex(RSA-OAEP(ECIES(plaintext)))`. Unknown keys are ignored.

use serde::{Deserialize, Serialize};

use mpc_recovery_core::{ChainCode, RootKeyShare, ShareScalar};

use crate::pipeline::DecryptPipeline;
use crate::BackupError;

/// Number of custodian shares carried by every record.
pub const HBC_SHARE_COUNT: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedShareRecord {
    pub hbc_private_keys: Vec<String>,
    pub hbc_chain_codes: Vec<String>,
    pub user_pub_key: String,
}

impl EncryptedShareRecord {
    /// Parse and shape-check a record. `entry` names the archive entry in errors.
    pub fn from_json(entry: &str, bytes: &[u8]) -> Result<Self, BackupError> {
        let record: Self =
            serde_json::from_slice(bytes).map_err(|e| BackupError::MalformedRecord {
                entry: entry.to_string(),
                reason: e.to_string(),
            })?;

        if record.hbc_private_keys.len() != HBC_SHARE_COUNT
            || record.hbc_chain_codes.len() != HBC_SHARE_COUNT
        {
            return Err(BackupError::MalformedRecord {
                entry: entry.to_string(),
                reason: format!(
                    "expected {} custodian keys and chain codes, got {} and {}",
                    HBC_SHARE_COUNT,
                    record.hbc_private_keys.len(),
                    record.hbc_chain_codes.len()
                ),
            });
        }
        Ok(record)
    }

    pub fn to_json(&self) -> Result<Vec<u8>, BackupError> {
        serde_json::to_vec_pretty(self).map_err(|e| BackupError::MalformedRecord {
            entry: String::new(),
            reason: e.to_string(),
        })
    }

    /// Seal custodian shares and the user's compressed public key into a record.
    pub fn seal(
        pipeline: &DecryptPipeline,
        user_pubkey: &[u8],
        hbc_shares: [&RootKeyShare; HBC_SHARE_COUNT],
    ) -> Result<Self, BackupError> {
        let mut hbc_private_keys = Vec::with_capacity(HBC_SHARE_COUNT);
        let mut hbc_chain_codes = Vec::with_capacity(HBC_SHARE_COUNT);
        for share in hbc_shares {
            hbc_private_keys.push(pipeline.seal_hex(share.scalar().as_bytes())?);
            hbc_chain_codes.push(pipeline.seal_hex(&share.chain_code().0)?);
        }
        Ok(Self {
            hbc_private_keys,
            hbc_chain_codes,
            user_pub_key: pipeline.seal_hex(user_pubkey)?,
        })
    }

    /// Decrypt the custodian share at `index` (0 or 1).
    pub fn open_share(
        &self,
        entry: &str,
        index: usize,
        pipeline: &DecryptPipeline,
    ) -> Result<RootKeyShare, BackupError> {
        let malformed = |reason: String| BackupError::MalformedRecord {
            entry: entry.to_string(),
            reason,
        };

        let (Some(key_hex), Some(chain_hex)) = (
            self.hbc_private_keys.get(index),
            self.hbc_chain_codes.get(index),
        ) else {
            return Err(malformed(format!("no custodian share at index {}", index)));
        };

        let key_bytes = pipeline.open_hex(&format!("hbc_private_keys[{}]", index), key_hex)?;
        let chain_bytes = pipeline.open_hex(&format!("hbc_chain_codes[{}]", index), chain_hex)?;

        let scalar = ShareScalar::from_be_slice(&key_bytes)
            .map_err(|e| malformed(format!("custodian share {}: {}", index, e)))?;
        let chain_code = ChainCode::from_slice(&chain_bytes).ok_or_else(|| {
            malformed(format!(
                "custodian chain code {} is {} bytes, expected 32",
                index,
                chain_bytes.len()
            ))
        })?;

        RootKeyShare::new(scalar, chain_code)
            .map_err(|e| malformed(format!("custodian share {}: {}", index, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_json(keys: usize, codes: usize) -> Vec<u8> {
        serde_json::json!({
            "hbc_private_keys": vec!["00"; keys],
            "hbc_chain_codes": vec!["00"; codes],
            "user_pub_key": "00",
            "team_id": 1002,
        })
        .to_string()
        .into_bytes()
    }

    #[test]
    fn test_parse_ignores_unknown_keys() {
        let record = EncryptedShareRecord::from_json("team.json", &record_json(2, 2)).unwrap();
        assert_eq!(record.hbc_private_keys.len(), 2);
        assert_eq!(record.user_pub_key, "00");
    }

    #[test]
    fn test_wrong_share_count_rejected() {
        for (keys, codes) in [(1, 2), (2, 3), (0, 0)] {
            match EncryptedShareRecord::from_json("team.json", &record_json(keys, codes)) {
                Err(BackupError::MalformedRecord { entry, .. }) => assert_eq!(entry, "team.json"),
                other => panic!("({}, {}) should be rejected, got {:?}", keys, codes, other),
            }
        }
    }

    #[test]
    fn test_missing_field_rejected() {
        let bytes = br#"{"hbc_private_keys": ["00", "00"], "hbc_chain_codes": ["00", "00"]}"#;
        assert!(matches!(
            EncryptedShareRecord::from_json("a.json", bytes),
            Err(BackupError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_not_json_rejected() {
        assert!(matches!(
            EncryptedShareRecord::from_json("notes.txt", b"plain text"),
            Err(BackupError::MalformedRecord { .. })
        ));
    }
}
