//! ECIES over secp256k1
//!
//! Envelope layout:
//! `[ephemeral pubkey, uncompressed (65)][nonce (16)][tag (16)][ciphertext]`
//!
//! The AES-256-GCM key is HKDF-SHA256 over the uncompressed ephemeral key
//! followed by the uncompressed ECDH shared point, with no salt and no info.

use std::fmt;

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Nonce};
use hkdf::Hkdf;
use rand::RngCore;
use secp256k1::{ecdh, PublicKey, Secp256k1, SecretKey};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::pipeline::{CipherError, CipherLayer, Layer};
use crate::BackupError;

/// Uncompressed SEC1 public key length
const PUBKEY_LEN: usize = 65;

/// AES-GCM nonce length (non-standard 16 bytes)
const NONCE_LEN: usize = 16;

/// AES-GCM tag length
const TAG_LEN: usize = 16;

/// Envelope bytes before the ciphertext
pub const HEADER_LEN: usize = PUBKEY_LEN + NONCE_LEN + TAG_LEN;

type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// The custodian's ECIES private key.
pub struct EciesLayer {
    secret: SecretKey,
}

impl EciesLayer {
    /// Parse a hex-encoded 32-byte secp256k1 private key.
    pub fn from_hex(key_hex: &str) -> Result<Self, BackupError> {
        let trimmed = key_hex.trim();
        if trimmed.is_empty() {
            return Err(BackupError::EmptyEciesKey);
        }
        let bytes = Zeroizing::new(
            hex::decode(trimmed).map_err(|e| BackupError::InvalidEciesKey(e.to_string()))?,
        );
        let secret =
            SecretKey::from_slice(&bytes).map_err(|e| BackupError::InvalidEciesKey(e.to_string()))?;
        Ok(Self { secret })
    }

    pub fn public_key(&self) -> PublicKey {
        self.secret.public_key(&Secp256k1::signing_only())
    }
}

impl fmt::Debug for EciesLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EciesLayer")
            .field("public_key", &self.public_key())
            .finish()
    }
}

impl CipherLayer for EciesLayer {
    fn layer(&self) -> Layer {
        Layer::Ecies
    }

    fn open(&self, ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>, CipherError> {
        decrypt(&self.secret, ciphertext)
    }

    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        encrypt(&self.public_key(), plaintext)
    }
}

/// Encrypt `plaintext` to `recipient` under a fresh ephemeral key.
pub fn encrypt(recipient: &PublicKey, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
    let ephemeral = SecretKey::new(&mut rand::thread_rng());
    let ephemeral_pub = ephemeral
        .public_key(&Secp256k1::signing_only())
        .serialize_uncompressed();
    let shared = Zeroizing::new(ecdh::shared_secret_point(recipient, &ephemeral));
    let key = derive_key(&ephemeral_pub, &shared)?;

    let mut nonce = [0u8; NONCE_LEN];
    rand::rngs::OsRng.fill_bytes(&mut nonce);

    let cipher = Aes256Gcm16::new_from_slice(&key[..])
        .map_err(|e| CipherError::Encryption(e.to_string()))?;
    let sealed = cipher
        .encrypt(Nonce::<U16>::from_slice(&nonce), plaintext)
        .map_err(|e| CipherError::Encryption(e.to_string()))?;

    // RustCrypto appends the tag; the envelope carries it before the ciphertext
    let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_LEN);
    let mut out = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    out.extend_from_slice(&ephemeral_pub);
    out.extend_from_slice(&nonce);
    out.extend_from_slice(tag);
    out.extend_from_slice(ciphertext);
    Ok(out)
}

/// Open an ECIES envelope with the recipient's private key.
pub fn decrypt(secret: &SecretKey, envelope: &[u8]) -> Result<Zeroizing<Vec<u8>>, CipherError> {
    if envelope.len() <= HEADER_LEN {
        return Err(CipherError::TooShort(envelope.len()));
    }

    let (ephemeral_bytes, rest) = envelope.split_at(PUBKEY_LEN);
    let (nonce, rest) = rest.split_at(NONCE_LEN);
    let (tag, ciphertext) = rest.split_at(TAG_LEN);

    let ephemeral = PublicKey::from_slice(ephemeral_bytes)
        .map_err(|e| CipherError::InvalidEphemeralKey(e.to_string()))?;
    let shared = Zeroizing::new(ecdh::shared_secret_point(&ephemeral, secret));
    let key = derive_key(&ephemeral.serialize_uncompressed(), &shared)?;

    let mut sealed = Vec::with_capacity(ciphertext.len() + TAG_LEN);
    sealed.extend_from_slice(ciphertext);
    sealed.extend_from_slice(tag);

    let cipher = Aes256Gcm16::new_from_slice(&key[..]).map_err(|_| CipherError::KeyDerivation)?;
    let plaintext = cipher
        .decrypt(Nonce::<U16>::from_slice(nonce), sealed.as_slice())
        .map_err(|_| CipherError::AuthenticationFailed)?;
    Ok(Zeroizing::new(plaintext))
}

fn derive_key(
    ephemeral_pub: &[u8; PUBKEY_LEN],
    shared_point: &[u8; 64],
) -> Result<Zeroizing<[u8; 32]>, CipherError> {
    let mut ikm = Zeroizing::new(Vec::with_capacity(PUBKEY_LEN * 2));
    ikm.extend_from_slice(ephemeral_pub);
    ikm.push(0x04);
    ikm.extend_from_slice(shared_point);

    let mut key = Zeroizing::new([0u8; 32]);
    Hkdf::<Sha256>::new(None, &ikm)
        .expand(&[], &mut key[..])
        .map_err(|_| CipherError::KeyDerivation)?;
    Ok(key)
}
