//! Share scalars
//!
//! A share is held as a raw 256-bit big-endian integer with no curve attached.
//! It only becomes a field element when reduced modulo a curve order, which
//! happens explicitly at every arithmetic site through [`CurveScalar`].

use std::fmt;

use num_bigint::BigUint;
use num_traits::Zero;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Order of the secp256k1 group (n).
const SECP256K1_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// Order of the Ed25519 prime-order subgroup (l = 2^252 + 27742317777372353535851937790883648493).
const ED25519_ORDER: [u8; 32] = [
    0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x14, 0xde, 0xf9, 0xde, 0xa2, 0xf7, 0x9c, 0xd6, 0x58, 0x12, 0x63, 0x1a, 0x5c, 0xf5, 0xd3, 0xed,
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScalarError {
    #[error("scalar is {0} bytes, at most 32 allowed")]
    TooLong(usize),
    #[error("scalar is zero modulo the {0} order")]
    Zero(CurveFamily),
    #[error("curve mismatch: expected {expected}, got {actual}")]
    CurveMismatch {
        expected: CurveFamily,
        actual: CurveFamily,
    },
    #[error("invalid point: {0}")]
    InvalidPoint(String),
}

/// The two signature curves a share is used on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveFamily {
    Secp256k1,
    Ed25519,
}

impl CurveFamily {
    /// Group order used to reduce scalars on this curve.
    pub fn order(&self) -> BigUint {
        match self {
            CurveFamily::Secp256k1 => BigUint::from_bytes_be(&SECP256K1_ORDER),
            CurveFamily::Ed25519 => BigUint::from_bytes_be(&ED25519_ORDER),
        }
    }
}

impl fmt::Display for CurveFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveFamily::Secp256k1 => write!(f, "secp256k1"),
            CurveFamily::Ed25519 => write!(f, "ed25519"),
        }
    }
}

/// A raw 256-bit share value (big-endian), shared by both curves.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ShareScalar([u8; 32]);

impl ShareScalar {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Accept up to 32 big-endian bytes, left-padding shorter encodings.
    pub fn from_be_slice(bytes: &[u8]) -> Result<Self, ScalarError> {
        if bytes.len() > 32 {
            return Err(ScalarError::TooLong(bytes.len()));
        }
        let mut out = [0u8; 32];
        out[32 - bytes.len()..].copy_from_slice(bytes);
        Ok(Self(out))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Reduce this share modulo the order of `curve`.
    pub fn reduce(&self, curve: CurveFamily) -> CurveScalar {
        CurveScalar::from_be_bytes_mod_order(&self.0, curve)
    }
}

impl fmt::Debug for ShareScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ShareScalar([REDACTED])")
    }
}

/// An integer already reduced modulo the order of its curve.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct CurveScalar {
    bytes: [u8; 32],
    #[zeroize(skip)]
    curve: CurveFamily,
}

impl CurveScalar {
    /// Interpret `bytes` as a big-endian integer of any length and reduce it.
    pub fn from_be_bytes_mod_order(bytes: &[u8], curve: CurveFamily) -> Self {
        let value = BigUint::from_bytes_be(bytes) % curve.order();
        Self {
            bytes: to_be32(&value),
            curve,
        }
    }

    pub fn zero(curve: CurveFamily) -> Self {
        Self {
            bytes: [0u8; 32],
            curve,
        }
    }

    pub fn curve(&self) -> CurveFamily {
        self.curve
    }

    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|b| *b == 0)
    }

    /// `(self + other) mod order`. Both operands must live on the same curve.
    pub fn add(&self, other: &CurveScalar) -> Result<CurveScalar, ScalarError> {
        if self.curve != other.curve {
            return Err(ScalarError::CurveMismatch {
                expected: self.curve,
                actual: other.curve,
            });
        }
        let sum = (BigUint::from_bytes_be(&self.bytes) + BigUint::from_bytes_be(&other.bytes))
            % self.curve.order();
        Ok(Self {
            bytes: to_be32(&sum),
            curve: self.curve,
        })
    }

    /// Fail with [`ScalarError::Zero`] if the scalar is zero.
    pub fn non_zero(self) -> Result<CurveScalar, ScalarError> {
        if self.is_zero() {
            return Err(ScalarError::Zero(self.curve));
        }
        Ok(self)
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.bytes
    }

    pub fn to_le_bytes(&self) -> [u8; 32] {
        let mut le = self.bytes;
        le.reverse();
        le
    }
}

impl fmt::Debug for CurveScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CurveScalar({}, [REDACTED])", self.curve)
    }
}

/// Left-pad a reduced value to 32 bytes. Callers guarantee `value < 2^256`.
fn to_be32(value: &BigUint) -> [u8; 32] {
    let mut out = [0u8; 32];
    if value.is_zero() {
        return out;
    }
    let bytes = value.to_bytes_be();
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}
