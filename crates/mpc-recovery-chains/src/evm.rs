//! Keccak-addressed chains: EVM networks and Tron

use bitcoin::base58;
use mpc_recovery_core::{CurveFamily, PublicPoint};
use sha3::{Digest, Keccak256};

use crate::{secp256k1_key, AddressCodec, CodecError};

/// Tron mainnet address prefix
const TRON_ADDRESS_PREFIX: u8 = 0x41;

/// EIP-55 checksummed `0x` address. Shared by every EVM chain.
pub struct EvmCodec;

/// Base58Check of `0x41 ‖ keccak address`.
pub struct TronCodec;

/// Last 20 bytes of keccak256 over the uncompressed key without its 0x04 prefix.
pub fn keccak_address(key: &secp256k1::PublicKey) -> [u8; 20] {
    let digest = Keccak256::digest(&key.serialize_uncompressed()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[12..]);
    address
}

/// Mixed-case checksum encoding (EIP-55).
pub fn to_checksum_address(address: &[u8; 20]) -> String {
    let lower = hex::encode(address);
    let hash = Keccak256::digest(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

impl AddressCodec for EvmCodec {
    fn name(&self) -> &'static str {
        "eth"
    }

    fn curve(&self) -> CurveFamily {
        CurveFamily::Secp256k1
    }

    fn encode_address(&self, public: &PublicPoint) -> Result<String, CodecError> {
        let key = secp256k1_key(self.name(), public)?;
        Ok(to_checksum_address(&keccak_address(key)))
    }
}

impl AddressCodec for TronCodec {
    fn name(&self) -> &'static str {
        "trx"
    }

    fn curve(&self) -> CurveFamily {
        CurveFamily::Secp256k1
    }

    fn encode_address(&self, public: &PublicPoint) -> Result<String, CodecError> {
        let key = secp256k1_key(self.name(), public)?;
        let mut payload = Vec::with_capacity(21);
        payload.push(TRON_ADDRESS_PREFIX);
        payload.extend_from_slice(&keccak_address(key));
        Ok(base58::encode_check(&payload))
    }
}
