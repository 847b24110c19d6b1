//! BIP-39 user share seeding
//!
//! The user's share is the BIP-32 master key of a 24-word English mnemonic
//! with an empty passphrase. Its compressed secp256k1 public key identifies
//! the matching backup record.

use bip39::{Language, Mnemonic};
use bitcoin::bip32::Xpriv;
use bitcoin::NetworkKind;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::scalar::{ScalarError, ShareScalar};
use crate::share::{ChainCode, RootKeyShare};

/// Required mnemonic length.
pub const MNEMONIC_WORD_COUNT: usize = 24;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Mnemonic must have 24 words, got {0}")]
    WrongWordCount(usize),
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),
    #[error("Master key derivation failed: {0}")]
    MasterKey(String),
    #[error(transparent)]
    Scalar(#[from] ScalarError),
}

/// Parse a 24-word English mnemonic, validating the checksum.
pub fn parse_mnemonic(words: &str) -> Result<Mnemonic, SeedError> {
    let count = words.split_whitespace().count();
    if count != MNEMONIC_WORD_COUNT {
        return Err(SeedError::WrongWordCount(count));
    }
    Mnemonic::parse_in(Language::English, words)
        .map_err(|e| SeedError::InvalidMnemonic(e.to_string()))
}

/// Derive the user's root key share from the mnemonic.
///
/// seed = PBKDF2(mnemonic, "mnemonic"), master = HMAC-SHA512("Bitcoin seed", seed).
/// The left half is the share scalar, the right half its chain code.
pub fn user_share_from_mnemonic(words: &str) -> Result<RootKeyShare, SeedError> {
    let mnemonic = parse_mnemonic(words)?;
    let seed = Zeroizing::new(mnemonic.to_seed(""));

    let master = Xpriv::new_master(NetworkKind::Main, &seed[..])
        .map_err(|e| SeedError::MasterKey(e.to_string()))?;

    let scalar = ShareScalar::from_bytes(master.private_key.secret_bytes());
    let chain_code = ChainCode(master.chain_code.to_bytes());
    Ok(RootKeyShare::new(scalar, chain_code)?)
}
