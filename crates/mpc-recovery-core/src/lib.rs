//! MPC Recovery Core
//!
//! Key material shared by every stage of a recovery run.
//!
//! # Shares
//!
//! The wallet root key is split additively into three 256-bit shares: two
//! held by the custodian (recovered from the backup archive) and one held by
//! the user (derived from a 24-word mnemonic). The same integers serve both
//! secp256k1 and Ed25519; each arithmetic site reduces them modulo the
//! relevant curve order.

pub mod memory;
pub mod point;
pub mod scalar;
pub mod seed;
pub mod share;

pub use point::PublicPoint;
pub use scalar::{CurveFamily, CurveScalar, ScalarError, ShareScalar};
pub use seed::{parse_mnemonic, user_share_from_mnemonic, SeedError, MNEMONIC_WORD_COUNT};
pub use share::{assemble, ChainCode, RootKeySet, RootKeyShare};
