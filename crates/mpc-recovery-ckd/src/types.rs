use std::fmt;

use mpc_recovery_chains::CodecError;
use mpc_recovery_core::{ChainCode, CurveScalar, PublicPoint, ScalarError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::path::DerivationPath;

/// First hardened child index (2^31).
pub const HARDENED_KEY_START: u32 = 0x8000_0000;

/// One level of non-hardened derivation.
#[derive(Debug, Clone)]
pub struct Tweak {
    /// `I_L` reduced modulo the curve order. Never zero.
    pub delta: CurveScalar,
    /// `I_R`, the chain code for the next level.
    pub chain_code: ChainCode,
    /// `reference + delta·G`, the reference point for the next level.
    pub child_reference: PublicPoint,
    pub index: u32,
}

/// A reconstructed child key ready for export.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedChild {
    pub scalar: CurveScalar,
    #[zeroize(skip)]
    pub public: PublicPoint,
    #[zeroize(skip)]
    pub address: String,
    /// Private key in the chain's export format (WIF or hex).
    pub private_key: String,
}

impl fmt::Debug for DerivedChild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedChild")
            .field("address", &self.address)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// One recovered keypair as written to the output artifact.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct DeriveResult {
    /// One-based vault index.
    pub vault_index: u32,
    /// Chain name as the caller spelled it.
    pub chain: String,
    pub address: String,
    pub private_key: String,
}

impl fmt::Debug for DeriveResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeriveResult")
            .field("vault_index", &self.vault_index)
            .field("chain", &self.chain)
            .field("address", &self.address)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CkdError {
    #[error("Hardened index {0} not supported (requires the full private key)")]
    HardenedIndex(u32),

    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("Derivation tweak at index {index} is zero")]
    ZeroTweak { index: u32 },

    #[error("Failed to derive child private key at {path} for coin type {coin_type}: {reason}")]
    DeriveChildPriv {
        path: DerivationPath,
        coin_type: u32,
        reason: String,
    },

    #[error("Failed to derive address at {path} for coin type {coin_type}: {reason}")]
    DeriveChildAddress {
        path: DerivationPath,
        coin_type: u32,
        reason: String,
    },

    #[error(transparent)]
    Chain(#[from] CodecError),

    #[error("Vault count must be at least 1")]
    InvalidVaultCount,

    #[error("Failed to start worker pool: {0}")]
    ThreadPool(String),

    #[error(transparent)]
    Scalar(#[from] ScalarError),
}
