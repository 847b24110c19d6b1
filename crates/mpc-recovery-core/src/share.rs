//! Root key shares and the three-share root key set

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::point::PublicPoint;
use crate::scalar::{CurveFamily, ScalarError, ShareScalar};

/// A 32-byte BIP-32 style chain code.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ChainCode(pub [u8; 32]);

impl ChainCode {
    /// Chain codes must be exactly 32 bytes; anything else is rejected.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; 32] = bytes.try_into().ok()?;
        Some(ChainCode(arr))
    }
}

impl fmt::Debug for ChainCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChainCode([REDACTED])")
    }
}

/// One additive share of the root key together with its chain code.
///
/// The same raw scalar backs both curves; the secp256k1 and Ed25519 public
/// points are computed once at construction.
#[derive(Clone)]
pub struct RootKeyShare {
    scalar: ShareScalar,
    chain_code: ChainCode,
    secp256k1_point: PublicPoint,
    ed25519_point: PublicPoint,
}

impl RootKeyShare {
    pub fn new(scalar: ShareScalar, chain_code: ChainCode) -> Result<Self, ScalarError> {
        let secp256k1_point = PublicPoint::from_scalar(&scalar.reduce(CurveFamily::Secp256k1))?;
        let ed25519_point = PublicPoint::from_scalar(&scalar.reduce(CurveFamily::Ed25519))?;
        Ok(Self {
            scalar,
            chain_code,
            secp256k1_point,
            ed25519_point,
        })
    }

    pub fn scalar(&self) -> &ShareScalar {
        &self.scalar
    }

    pub fn chain_code(&self) -> &ChainCode {
        &self.chain_code
    }

    /// This share's own public point on `curve`.
    pub fn point(&self, curve: CurveFamily) -> &PublicPoint {
        match curve {
            CurveFamily::Secp256k1 => &self.secp256k1_point,
            CurveFamily::Ed25519 => &self.ed25519_point,
        }
    }

    /// Compressed secp256k1 public key; this is what backup records store
    /// for the user share.
    pub fn secp256k1_pubkey_hex(&self) -> String {
        hex::encode(self.secp256k1_point.to_bytes())
    }
}

impl fmt::Debug for RootKeyShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootKeyShare")
            .field("secp256k1_point", &self.secp256k1_pubkey_hex())
            .field("scalar", &"[REDACTED]")
            .finish()
    }
}

/// The two custodian shares and the user share, plus the aggregate Edwards
/// point used as the reference point for Ed25519 derivation.
#[derive(Debug, Clone)]
pub struct RootKeySet {
    shares: [RootKeyShare; 3],
    ed25519_aggregate: PublicPoint,
}

impl RootKeySet {
    /// Shares in fixed order: custodian share 0, custodian share 1, user share.
    pub fn shares(&self) -> &[RootKeyShare; 3] {
        &self.shares
    }

    pub fn user_share(&self) -> &RootKeyShare {
        &self.shares[2]
    }

    /// Sum of the three per-share Edwards points.
    pub fn ed25519_aggregate(&self) -> &PublicPoint {
        &self.ed25519_aggregate
    }
}

/// Combine the recovered custodian shares with the user share.
pub fn assemble(
    hbc_share0: RootKeyShare,
    hbc_share1: RootKeyShare,
    user_share: RootKeyShare,
) -> Result<RootKeySet, ScalarError> {
    let ed25519_aggregate = hbc_share0
        .point(CurveFamily::Ed25519)
        .combine(hbc_share1.point(CurveFamily::Ed25519))?
        .combine(user_share.point(CurveFamily::Ed25519))?;

    log::debug!("assembled root key set");

    Ok(RootKeySet {
        shares: [hbc_share0, hbc_share1, user_share],
        ed25519_aggregate,
    })
}
