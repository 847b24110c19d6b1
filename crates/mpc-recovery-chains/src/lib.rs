//! MPC Recovery Chains
//!
//! Maps chain names to BIP-44 coin types, signature curves and address
//! codecs. A codec turns a derived public point into the chain's address
//! string and a derived scalar into the chain's private key export format.

pub mod eddsa;
pub mod evm;
pub mod registry;
pub mod ton;
pub mod utxo;

use mpc_recovery_core::{CurveFamily, CurveScalar, PublicPoint};
use thiserror::Error;

pub use registry::{
    codec_for_coin_type, curve_for_coin_type, lookup_chain, supported_chains, ChainInfo,
    EDDSA_COIN_TYPES,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Chain name is empty")]
    EmptyChainName,
    #[error("Unsupported chain: {0}")]
    UnsupportedChain(String),
    #[error("No address codec for coin type {0}")]
    UnknownCoinType(u32),
    #[error("{codec} expects a {expected} key, got {actual}")]
    CurveMismatch {
        codec: &'static str,
        expected: CurveFamily,
        actual: CurveFamily,
    },
}

/// Address and private key encoding for one family of chains.
pub trait AddressCodec: Send + Sync {
    /// Short codec name used in errors and logs.
    fn name(&self) -> &'static str;

    fn curve(&self) -> CurveFamily;

    fn encode_address(&self, public: &PublicPoint) -> Result<String, CodecError>;

    /// Private key export format. Defaults to 32-byte big-endian hex.
    fn encode_private_key(&self, scalar: &CurveScalar) -> Result<String, CodecError> {
        self.check_curve(scalar.curve())?;
        Ok(hex::encode(scalar.to_be_bytes()))
    }

    fn check_curve(&self, actual: CurveFamily) -> Result<(), CodecError> {
        if actual != self.curve() {
            return Err(CodecError::CurveMismatch {
                codec: self.name(),
                expected: self.curve(),
                actual,
            });
        }
        Ok(())
    }
}

/// Borrow the secp256k1 key out of `public` or report a curve mismatch.
pub(crate) fn secp256k1_key<'a>(
    codec: &'static str,
    public: &'a PublicPoint,
) -> Result<&'a secp256k1::PublicKey, CodecError> {
    public.as_secp256k1().ok_or(CodecError::CurveMismatch {
        codec,
        expected: CurveFamily::Secp256k1,
        actual: public.curve(),
    })
}

/// 32-byte RFC 8032 encoding of an Ed25519 point, or a curve mismatch.
pub(crate) fn ed25519_key(codec: &'static str, public: &PublicPoint) -> Result<[u8; 32], CodecError> {
    public
        .as_ed25519()
        .map(|p| p.compress().to_bytes())
        .ok_or(CodecError::CurveMismatch {
            codec,
            expected: CurveFamily::Ed25519,
            actual: public.curve(),
        })
}
