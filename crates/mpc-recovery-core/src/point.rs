//! Public points on secp256k1 and Ed25519
//!
//! [`PublicPoint`] wraps the native point type of each curve so derivation
//! code can stay curve-agnostic. Edwards points additionally expose a
//! 33-byte `prefix ‖ x` form so both curves feed the same tweak hash layout.

use std::sync::OnceLock;

use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::scalar::Scalar as EdwardsScalar;
use num_bigint::BigUint;
use num_traits::One;
use secp256k1::{PublicKey, Secp256k1, SecretKey};

use crate::scalar::{CurveFamily, CurveScalar, ScalarError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicPoint {
    Secp256k1(PublicKey),
    Ed25519(EdwardsPoint),
}

impl PublicPoint {
    /// `k·G` on the curve `k` was reduced for.
    pub fn from_scalar(k: &CurveScalar) -> Result<Self, ScalarError> {
        if k.is_zero() {
            return Err(ScalarError::Zero(k.curve()));
        }
        match k.curve() {
            CurveFamily::Secp256k1 => {
                let sk = SecretKey::from_slice(&k.to_be_bytes())
                    .map_err(|e| ScalarError::InvalidPoint(e.to_string()))?;
                Ok(PublicPoint::Secp256k1(PublicKey::from_secret_key(
                    &Secp256k1::signing_only(),
                    &sk,
                )))
            }
            CurveFamily::Ed25519 => {
                let s = EdwardsScalar::from_bytes_mod_order(k.to_le_bytes());
                Ok(PublicPoint::Ed25519(EdwardsPoint::mul_base(&s)))
            }
        }
    }

    pub fn curve(&self) -> CurveFamily {
        match self {
            PublicPoint::Secp256k1(_) => CurveFamily::Secp256k1,
            PublicPoint::Ed25519(_) => CurveFamily::Ed25519,
        }
    }

    /// Point addition. Fails on a curve mismatch or (secp256k1) the point at infinity.
    pub fn combine(&self, other: &PublicPoint) -> Result<Self, ScalarError> {
        match (self, other) {
            (PublicPoint::Secp256k1(a), PublicPoint::Secp256k1(b)) => a
                .combine(b)
                .map(PublicPoint::Secp256k1)
                .map_err(|e| ScalarError::InvalidPoint(e.to_string())),
            (PublicPoint::Ed25519(a), PublicPoint::Ed25519(b)) => Ok(PublicPoint::Ed25519(a + b)),
            _ => Err(ScalarError::CurveMismatch {
                expected: self.curve(),
                actual: other.curve(),
            }),
        }
    }

    /// `self + tweak·G`.
    pub fn add_tweak(&self, tweak: &CurveScalar) -> Result<Self, ScalarError> {
        if tweak.curve() != self.curve() {
            return Err(ScalarError::CurveMismatch {
                expected: self.curve(),
                actual: tweak.curve(),
            });
        }
        match self {
            PublicPoint::Secp256k1(pk) => {
                let t = secp256k1::Scalar::from_be_bytes(tweak.to_be_bytes())
                    .map_err(|e| ScalarError::InvalidPoint(e.to_string()))?;
                pk.add_exp_tweak(&Secp256k1::verification_only(), &t)
                    .map(PublicPoint::Secp256k1)
                    .map_err(|e| ScalarError::InvalidPoint(e.to_string()))
            }
            PublicPoint::Ed25519(point) => {
                let t = EdwardsScalar::from_bytes_mod_order(tweak.to_le_bytes());
                Ok(PublicPoint::Ed25519(point + EdwardsPoint::mul_base(&t)))
            }
        }
    }

    /// Native public key encoding: 33-byte compressed SEC1 on secp256k1,
    /// 32-byte RFC 8032 encoding on Ed25519.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            PublicPoint::Secp256k1(pk) => pk.serialize().to_vec(),
            PublicPoint::Ed25519(point) => point.compress().to_bytes().to_vec(),
        }
    }

    /// `(0x02 | y parity) ‖ x` over affine coordinates, used as tweak input.
    ///
    /// On secp256k1 this is the standard compressed key. On Ed25519 the
    /// affine twisted-Edwards coordinates are used.
    pub fn serialize_compressed(&self) -> [u8; 33] {
        match self {
            PublicPoint::Secp256k1(pk) => pk.serialize(),
            PublicPoint::Ed25519(point) => {
                let (x, y) = edwards_affine(point);
                let mut out = [0u8; 33];
                out[0] = 0x02 | u8::from(is_odd(&y));
                let x_bytes = x.to_bytes_be();
                if x_bytes != [0] {
                    out[33 - x_bytes.len()..].copy_from_slice(&x_bytes);
                }
                out
            }
        }
    }

    pub fn as_secp256k1(&self) -> Option<&PublicKey> {
        match self {
            PublicPoint::Secp256k1(pk) => Some(pk),
            PublicPoint::Ed25519(_) => None,
        }
    }

    pub fn as_ed25519(&self) -> Option<&EdwardsPoint> {
        match self {
            PublicPoint::Ed25519(point) => Some(point),
            PublicPoint::Secp256k1(_) => None,
        }
    }
}

// ============================================================================
// Edwards affine coordinates
// ============================================================================

struct EdwardsField {
    p: BigUint,
    d: BigUint,
    sqrt_m1: BigUint,
}

fn edwards_field() -> &'static EdwardsField {
    static FIELD: OnceLock<EdwardsField> = OnceLock::new();
    FIELD.get_or_init(|| {
        let p = (BigUint::one() << 255u32) - 19u32;
        let inv_121666 = BigUint::from(121_666u32).modpow(&(&p - 2u32), &p);
        let d = ((&p - 121_665u32) * inv_121666) % &p;
        let sqrt_m1 = BigUint::from(2u32).modpow(&((&p - 1u32) >> 2u32), &p);
        EdwardsField { p, d, sqrt_m1 }
    })
}

fn is_odd(v: &BigUint) -> bool {
    v.to_bytes_le()[0] & 1 == 1
}

/// Recover affine `(x, y)` from the compressed encoding.
///
/// x² = (y² − 1) / (d·y² + 1); the encoding's top bit selects the root.
fn edwards_affine(point: &EdwardsPoint) -> (BigUint, BigUint) {
    let field = edwards_field();
    let p = &field.p;

    let mut encoded = point.compress().to_bytes();
    let x_odd = encoded[31] & 0x80 != 0;
    encoded[31] &= 0x7f;
    let y = BigUint::from_bytes_le(&encoded);

    let y2 = (&y * &y) % p;
    let u = (&y2 + p - 1u32) % p;
    let v = (&field.d * &y2 + 1u32) % p;
    let x2 = (u * v.modpow(&(p - 2u32), p)) % p;

    let mut x = x2.modpow(&((p + 3u32) >> 3u32), p);
    if (&x * &x) % p != x2 {
        x = (x * &field.sqrt_m1) % p;
    }
    if is_odd(&x) != x_odd {
        x = (p - &x) % p;
    }
    (x, y)
}
