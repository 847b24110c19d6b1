//! RSA-OAEP outer layer
//!
//! OAEP uses SHA-256 for both the label hash and MGF1, with the fixed label
//! `HBC_MPC`.

use std::fmt;

use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::pipeline::{CipherError, CipherLayer, Layer};
use crate::BackupError;

/// OAEP label bound into every backup ciphertext.
pub const OAEP_LABEL: &str = "HBC_MPC";

/// The custodian's RSA private key.
pub struct RsaOaepLayer {
    key: RsaPrivateKey,
}

impl RsaOaepLayer {
    /// Parse a PEM private key (PKCS#8 or PKCS#1), or the same PEM hex encoded.
    pub fn from_key_str(input: &str) -> Result<Self, BackupError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(BackupError::EmptyRsaKey);
        }

        let pem = match hex::decode(trimmed) {
            Ok(bytes) => Zeroizing::new(String::from_utf8(bytes).map_err(|_| {
                BackupError::InvalidRsaKey("hex-encoded key is not a PEM document".into())
            })?),
            Err(_) => Zeroizing::new(trimmed.to_string()),
        };

        let key = RsaPrivateKey::from_pkcs8_pem(&pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(&pem))
            .map_err(|e| BackupError::InvalidRsaKey(e.to_string()))?;
        Ok(Self { key })
    }

    fn padding() -> Oaep {
        Oaep::new_with_label::<Sha256, _>(OAEP_LABEL)
    }
}

impl fmt::Debug for RsaOaepLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaOaepLayer")
            .field("modulus_bits", &(self.key.size() * 8))
            .finish()
    }
}

impl CipherLayer for RsaOaepLayer {
    fn layer(&self) -> Layer {
        Layer::RsaOaep
    }

    fn open(&self, ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>, CipherError> {
        self.key
            .decrypt(Self::padding(), ciphertext)
            .map(Zeroizing::new)
            .map_err(|e| CipherError::Rsa(e.to_string()))
    }

    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        self.key
            .to_public_key()
            .encrypt(&mut rand::rngs::OsRng, Self::padding(), plaintext)
            .map_err(|e| CipherError::Encryption(e.to_string()))
    }
}
