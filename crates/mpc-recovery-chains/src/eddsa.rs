//! Ed25519 chains: Solana, Aptos and Polkadot

use bitcoin::base58;
use blake2::Blake2b512;
use mpc_recovery_core::{CurveFamily, PublicPoint};
use sha3::{Digest, Sha3_256};

use crate::{ed25519_key, AddressCodec, CodecError};

/// Aptos single-signer authentication scheme byte
const APTOS_ED25519_SCHEME: u8 = 0x00;

/// SS58 checksum preimage prefix
const SS58_PREFIX: &[u8] = b"SS58PRE";

/// Base58 of the raw 32-byte public key.
pub struct SolanaCodec;

/// `0x` + SHA3-256(pubkey ‖ scheme) with leading zeros trimmed.
pub struct AptosCodec;

/// SS58 with a single-byte network prefix.
pub struct PolkadotCodec {
    pub network: u8,
}

pub const POLKADOT: PolkadotCodec = PolkadotCodec { network: 0 };

impl AddressCodec for SolanaCodec {
    fn name(&self) -> &'static str {
        "sol"
    }

    fn curve(&self) -> CurveFamily {
        CurveFamily::Ed25519
    }

    fn encode_address(&self, public: &PublicPoint) -> Result<String, CodecError> {
        Ok(base58::encode(&ed25519_key(self.name(), public)?))
    }
}

impl AddressCodec for AptosCodec {
    fn name(&self) -> &'static str {
        "apt"
    }

    fn curve(&self) -> CurveFamily {
        CurveFamily::Ed25519
    }

    fn encode_address(&self, public: &PublicPoint) -> Result<String, CodecError> {
        let key = ed25519_key(self.name(), public)?;
        let mut hasher = Sha3_256::new();
        hasher.update(key);
        hasher.update([APTOS_ED25519_SCHEME]);
        let auth_key = hex::encode(hasher.finalize());

        let trimmed = auth_key.trim_start_matches('0');
        Ok(format!("0x{}", if trimmed.is_empty() { "0" } else { trimmed }))
    }
}

impl AddressCodec for PolkadotCodec {
    fn name(&self) -> &'static str {
        "dot"
    }

    fn curve(&self) -> CurveFamily {
        CurveFamily::Ed25519
    }

    fn encode_address(&self, public: &PublicPoint) -> Result<String, CodecError> {
        let key = ed25519_key(self.name(), public)?;

        let mut payload = Vec::with_capacity(35);
        payload.push(self.network);
        payload.extend_from_slice(&key);

        let mut hasher = Blake2b512::new();
        hasher.update(SS58_PREFIX);
        hasher.update(&payload);
        let checksum = hasher.finalize();

        payload.extend_from_slice(&checksum[..2]);
        Ok(base58::encode(&payload))
    }
}
