//! Layered field encryption
//!
//! Every secret field in a backup record was sealed twice: first with ECIES to
//! the custodian's secp256k1 key, then with RSA-OAEP to its RSA key, and the
//! result hex encoded. Opening peels the layers from the outside in, and every
//! failure names the layer and the field it happened on.

use std::fmt;

use thiserror::Error;
use zeroize::Zeroizing;

use crate::ecies::EciesLayer;
use crate::rsa_oaep::RsaOaepLayer;
use crate::BackupError;

/// Which cipher a layer applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    RsaOaep,
    Ecies,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::RsaOaep => write!(f, "RSA-OAEP"),
            Layer::Ecies => write!(f, "ECIES"),
        }
    }
}

#[derive(Error, Debug)]
pub enum CipherError {
    #[error("ciphertext too short: {0} bytes")]
    TooShort(usize),
    #[error("invalid ephemeral public key: {0}")]
    InvalidEphemeralKey(String),
    #[error("authentication failed")]
    AuthenticationFailed,
    #[error("key derivation failed")]
    KeyDerivation,
    #[error("{0}")]
    Rsa(String),
    #[error("encryption failed: {0}")]
    Encryption(String),
}

/// One reversible encryption layer.
pub trait CipherLayer: Send + Sync {
    fn layer(&self) -> Layer;

    fn open(&self, ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>, CipherError>;

    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, CipherError>;
}

/// Ordered cipher layers, outermost first.
pub struct DecryptPipeline {
    layers: Vec<Box<dyn CipherLayer>>,
}

impl DecryptPipeline {
    /// The backup layout: RSA-OAEP outside, ECIES inside.
    pub fn new(rsa: RsaOaepLayer, ecies: EciesLayer) -> Self {
        Self::from_layers(vec![Box::new(rsa), Box::new(ecies)])
    }

    pub fn from_layers(layers: Vec<Box<dyn CipherLayer>>) -> Self {
        Self { layers }
    }

    /// Hex decode `encoded` and open every layer in order.
    pub fn open_hex(&self, field: &str, encoded: &str) -> Result<Zeroizing<Vec<u8>>, BackupError> {
        let mut data = Zeroizing::new(hex::decode(encoded.trim()).map_err(|e| {
            BackupError::MalformedField {
                field: field.to_string(),
                reason: format!("not hex: {}", e),
            }
        })?);

        for layer in &self.layers {
            data = layer
                .open(&data)
                .map_err(|source| BackupError::Decryption {
                    layer: layer.layer(),
                    field: field.to_string(),
                    source,
                })?;
        }
        Ok(data)
    }

    /// Apply the layers innermost first and hex encode. Inverse of [`open_hex`].
    ///
    /// [`open_hex`]: DecryptPipeline::open_hex
    pub fn seal_hex(&self, plaintext: &[u8]) -> Result<String, BackupError> {
        let mut data = plaintext.to_vec();
        for layer in self.layers.iter().rev() {
            data = layer
                .seal(&data)
                .map_err(|source| BackupError::Encryption {
                    layer: layer.layer(),
                    source,
                })?;
        }
        Ok(hex::encode(data))
    }
}
