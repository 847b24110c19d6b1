//! # Per-share Child Key Derivation
//!
//! Each additive root share is derived independently with BIP-32 style
//! non-hardened derivation. The tweak at every level depends only on a chain
//! code and a public reference point, so each share can be walked on its own
//! and the child key is recovered by summing the three child shares.
//!
//! Reference points differ per curve:
//! - secp256k1: each share's own public point
//! - Ed25519: the aggregate of all three shares' points, so every share
//!   starts from the same reference
//!
//! Tweak input is `ser(ref) || index_be32` where `ser` is the 33-byte
//! `(0x02 | y parity) || x` form on both curves.

pub mod path;
pub mod scheduler;
pub mod types;

use std::mem;

use bitcoin::hashes::{sha512, Hash, HashEngine, Hmac, HmacEngine};
use mpc_recovery_chains::{codec_for_coin_type, curve_for_coin_type};
use mpc_recovery_core::{ChainCode, CurveFamily, CurveScalar, PublicPoint, RootKeySet, RootKeyShare};

pub use path::DerivationPath;
pub use scheduler::{derive_all, resolve_chains, MAX_CONCURRENT_CHAINS};
pub use types::*;

/// Compute the tweak for one non-hardened child index.
///
///   I = HMAC-SHA512(key=chain_code, data=ser(reference) || ser_32(index))
///   delta = parse_256(I_L) mod order, chain_code' = I_R
///
/// The curve is taken from `reference`.
pub fn compute_tweak(
    chain_code: &ChainCode,
    reference: &PublicPoint,
    index: u32,
) -> Result<Tweak, CkdError> {
    // Hardened indices need the parent private key
    if index >= HARDENED_KEY_START {
        return Err(CkdError::HardenedIndex(index));
    }

    let mut engine = HmacEngine::<sha512::Hash>::new(&chain_code.0);
    engine.input(&reference.serialize_compressed());
    engine.input(&index.to_be_bytes());
    let hmac_result = Hmac::from_engine(engine);

    let delta = CurveScalar::from_be_bytes_mod_order(&hmac_result[..32], reference.curve())
        .non_zero()
        .map_err(|_| CkdError::ZeroTweak { index })?;

    let child_reference = reference.add_tweak(&delta)?;

    let mut next = [0u8; 32];
    next.copy_from_slice(&hmac_result[32..]);

    Ok(Tweak {
        delta,
        chain_code: ChainCode(next),
        child_reference,
        index,
    })
}

/// Chain of tweaks for a whole path. Each level uses the previous level's
/// child reference point and `I_R` as its parent.
pub fn compute_tweak_path(
    chain_code: &ChainCode,
    reference: &PublicPoint,
    path: &DerivationPath,
) -> Result<Vec<Tweak>, CkdError> {
    let mut current_reference = *reference;
    let mut current_chain_code = chain_code.clone();
    let mut tweaks = Vec::with_capacity(path.indices().len());

    for &index in path.indices() {
        let tweak = compute_tweak(&current_chain_code, &current_reference, index)?;
        current_reference = tweak.child_reference;
        current_chain_code = tweak.chain_code.clone();
        tweaks.push(tweak);
    }

    Ok(tweaks)
}

/// The starting reference point for `share` on `curve`.
pub fn reference_point(keys: &RootKeySet, share: &RootKeyShare, curve: CurveFamily) -> PublicPoint {
    match curve {
        CurveFamily::Secp256k1 => *share.point(curve),
        CurveFamily::Ed25519 => *keys.ed25519_aggregate(),
    }
}

/// Derive one share's child scalar: `share + sum(delta_i) mod order`.
pub fn derive_share_child(
    keys: &RootKeySet,
    share: &RootKeyShare,
    path: &DerivationPath,
    coin_type: u32,
) -> Result<CurveScalar, CkdError> {
    let curve = curve_for_coin_type(coin_type);
    let reference = reference_point(keys, share, curve);

    compute_tweak_path(share.chain_code(), &reference, path)?
        .iter()
        .try_fold(share.scalar().reduce(curve), |k, tweak| {
            k.add(&tweak.delta).map_err(CkdError::from)
        })
}

/// Sum of the three per-share child scalars.
pub fn derive_child_private_key(
    keys: &RootKeySet,
    path: &DerivationPath,
    coin_type: u32,
) -> Result<CurveScalar, CkdError> {
    let curve = curve_for_coin_type(coin_type);
    let mut child = CurveScalar::zero(curve);

    for share in keys.shares() {
        let share_child = derive_share_child(keys, share, path, coin_type).map_err(|e| {
            CkdError::DeriveChildPriv {
                path: path.clone(),
                coin_type,
                reason: e.to_string(),
            }
        })?;
        child = child.add(&share_child)?;
    }

    child.non_zero().map_err(|e| CkdError::DeriveChildPriv {
        path: path.clone(),
        coin_type,
        reason: e.to_string(),
    })
}

/// Derive the child key at `path` and encode it for `coin_type`.
pub fn derive_child(
    keys: &RootKeySet,
    path: &DerivationPath,
    coin_type: u32,
) -> Result<DerivedChild, CkdError> {
    let scalar = derive_child_private_key(keys, path, coin_type)?;

    let address_error = |reason: String| CkdError::DeriveChildAddress {
        path: path.clone(),
        coin_type,
        reason,
    };

    let codec = codec_for_coin_type(coin_type).map_err(|e| address_error(e.to_string()))?;
    let public = PublicPoint::from_scalar(&scalar).map_err(|e| address_error(e.to_string()))?;
    let address = codec
        .encode_address(&public)
        .map_err(|e| address_error(e.to_string()))?;

    let private_key = codec
        .encode_private_key(&scalar)
        .map_err(|e| CkdError::DeriveChildPriv {
            path: path.clone(),
            coin_type,
            reason: e.to_string(),
        })?;

    Ok(DerivedChild {
        scalar,
        public,
        address,
        private_key,
    })
}

/// Move the exported strings out of a derived child.
pub(crate) fn into_result(mut child: DerivedChild, vault_index: u32, chain: &str) -> DeriveResult {
    DeriveResult {
        vault_index,
        chain: chain.to_string(),
        address: mem::take(&mut child.address),
        private_key: mem::take(&mut child.private_key),
    }
}


#[cfg(test)]
mod tests {
    use super::test_keys::*;
    use super::*;

    fn path(s: &str) -> DerivationPath {
        s.parse().unwrap()
    }

    #[test]
    fn test_secp_tweak_uses_own_point() {
        let keys = test_keys();
        let share = &keys.shares()[0];
        let reference = reference_point(&keys, share, CurveFamily::Secp256k1);
        assert_eq!(&reference, share.point(CurveFamily::Secp256k1));

        let tweak = compute_tweak(share.chain_code(), &reference, 81).unwrap();
        assert_eq!(
            hex::encode(tweak.delta.to_be_bytes()),
            "a48fe3db8d23f6f05e6c7d051389bc3efa5bbe42a48b592700d8d3a877e94432"
        );
    }

    #[test]
    fn test_ed25519_tweak_uses_aggregate() {
        let keys = test_keys();
        for share in keys.shares() {
            assert_eq!(
                &reference_point(&keys, share, CurveFamily::Ed25519),
                keys.ed25519_aggregate()
            );
        }

        let share = &keys.shares()[0];
        let tweak = compute_tweak(share.chain_code(), keys.ed25519_aggregate(), 81).unwrap();
        assert_eq!(
            hex::encode(tweak.delta.to_be_bytes()),
            "0d34f39d850e6de40c5fb91aadeb7a0134d05683a235ed38ae4ef9197de7ed28"
        );
    }

    #[test]
    fn test_tweak_advances_reference() {
        let keys = test_keys();
        let share = &keys.shares()[1];
        let reference = share.point(CurveFamily::Secp256k1);
        let tweak = compute_tweak(share.chain_code(), reference, 0).unwrap();
        assert_eq!(
            tweak.child_reference,
            reference.add_tweak(&tweak.delta).unwrap()
        );
        assert_ne!(&tweak.chain_code, share.chain_code());
    }

    #[test]
    fn test_hardened_index_rejected() {
        let keys = test_keys();
        let share = &keys.shares()[0];
        let err = compute_tweak(
            share.chain_code(),
            share.point(CurveFamily::Secp256k1),
            HARDENED_KEY_START,
        )
        .unwrap_err();
        assert_eq!(err, CkdError::HardenedIndex(HARDENED_KEY_START));
    }

    #[test]
    fn test_bitcoin_child_vector() {
        let keys = test_keys();
        let child = derive_child(&keys, &path("81/0/0/0/0"), 0).unwrap();
        assert_eq!(
            hex::encode(child.scalar.to_be_bytes()),
            "07c3a182e5a8acc4b91938113443ba360570f68d6820f304efd120f84ab64a59"
        );
        assert_eq!(child.address, "1KnTkCiekMRh1k1yFC1zGGojrbf8LKP7sf");
        assert_eq!(
            child.private_key,
            "KwUoZ2DoEfiX7mzoCBjQ9ZZ5A1NLJDhcRpcp5rLeKSLBFeFrbRzE"
        );
    }

    #[test]
    fn test_vault_index_changes_child() {
        let keys = test_keys();
        let child = derive_child_private_key(&keys, &path("81/0/1/0/0"), 0).unwrap();
        assert_eq!(
            hex::encode(child.to_be_bytes()),
            "0aedc4e12c0bb1d1e8ce3d5dde2e369e8ac5633b7f45b3a18fe2c6af8698f67b"
        );
    }

    #[test]
    fn test_solana_child_vector() {
        let keys = test_keys();
        let child = derive_child(&keys, &path("81/0/0/501/0"), 501).unwrap();
        assert_eq!(child.scalar.curve(), CurveFamily::Ed25519);
        assert_eq!(
            hex::encode(child.scalar.to_be_bytes()),
            "097cb7f9b34158ff652496c6e641e93288e940ff11d3e1a239ae0219d6e28301"
        );
        assert_eq!(child.address, "FARykgbNTvLoB35jXizfzkHmemtBxPn2uFMpGK2BRVzx");
        assert_eq!(child.private_key, hex::encode(child.scalar.to_be_bytes()));
    }

    #[test]
    fn test_share_child_matches_public_derivation() {
        // Walking each share's public reference with the same tweaks must land
        // on the public point of the summed private child
        let keys = test_keys();
        for (coin_type, p) in [(0u32, "81/0/0/0/0"), (501, "81/0/2/501/0")] {
            let p = path(p);
            let curve = curve_for_coin_type(coin_type);
            let child = derive_child(&keys, &p, coin_type).unwrap();

            let mut summed: Option<PublicPoint> = None;
            for share in keys.shares() {
                let total_delta = compute_tweak_path(
                    share.chain_code(),
                    &reference_point(&keys, share, curve),
                    &p,
                )
                .unwrap()
                .iter()
                .try_fold(CurveScalar::zero(curve), |acc, t| acc.add(&t.delta))
                .unwrap();
                let share_child = share.point(curve).add_tweak(&total_delta).unwrap();
                summed = Some(match summed {
                    None => share_child,
                    Some(acc) => acc.combine(&share_child).unwrap(),
                });
            }
            assert_eq!(summed.unwrap(), child.public, "coin type {}", coin_type);
        }
    }

    #[test]
    fn test_share_children_sum_in_any_order() {
        let keys = test_keys();
        let p = path("81/0/0/60/0");
        let parts: Vec<CurveScalar> = keys
            .shares()
            .iter()
            .map(|s| derive_share_child(&keys, s, &p, 60).unwrap())
            .collect();
        let forward = parts[0].add(&parts[1]).unwrap().add(&parts[2]).unwrap();
        let backward = parts[2].add(&parts[0]).unwrap().add(&parts[1]).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward, derive_child_private_key(&keys, &p, 60).unwrap());
    }

    #[test]
    fn test_api_wallet_path_derives() {
        let keys = test_keys();
        let api = derive_child(&keys, &DerivationPath::api_wallet(60, 0).unwrap(), 60).unwrap();
        let asset = derive_child(&keys, &DerivationPath::asset_wallet(0, 60).unwrap(), 60).unwrap();
        assert!(api.address.starts_with("0x"));
        assert_ne!(api.address, asset.address);
    }

    #[test]
    fn test_unknown_coin_type_is_address_error() {
        let keys = test_keys();
        let err = derive_child(&keys, &path("81/0/0/9999/0"), 9999).unwrap_err();
        match err {
            CkdError::DeriveChildAddress { path, coin_type, .. } => {
                assert_eq!(path.to_string(), "81/0/0/9999/0");
                assert_eq!(coin_type, 9999);
            }
            other => panic!("expected DeriveChildAddress, got {:?}", other),
        }
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let keys = test_keys();
        let p = path("81/0/4/637/0");
        let a = derive_child(&keys, &p, 637).unwrap();
        let b = derive_child(&keys, &p, 637).unwrap();
        assert_eq!(a.address, b.address);
        assert_eq!(a.scalar, b.scalar);
    }
}
