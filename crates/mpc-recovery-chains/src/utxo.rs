//! Bitcoin-family chains: P2PKH addresses and compressed WIF keys

use bitcoin::base58;
use bitcoin::hashes::{hash160, Hash};
use mpc_recovery_core::{CurveFamily, CurveScalar, PublicPoint};
use zeroize::Zeroizing;

use crate::{secp256k1_key, AddressCodec, CodecError};

/// Legacy pay-to-pubkey-hash with network-specific version bytes.
pub struct P2pkhCodec {
    pub name: &'static str,
    /// Address version byte
    pub pubkey_hash_version: u8,
    /// WIF version byte
    pub wif_version: u8,
}

pub const BITCOIN: P2pkhCodec = P2pkhCodec {
    name: "btc",
    pubkey_hash_version: 0x00,
    wif_version: 0x80,
};

pub const LITECOIN: P2pkhCodec = P2pkhCodec {
    name: "ltc",
    pubkey_hash_version: 0x30,
    wif_version: 0xb0,
};

pub const DOGECOIN: P2pkhCodec = P2pkhCodec {
    name: "doge",
    pubkey_hash_version: 0x1e,
    wif_version: 0x9e,
};

/// Bitcoin Cash keeps the legacy Bitcoin encoding.
pub const BITCOIN_CASH: P2pkhCodec = P2pkhCodec {
    name: "bch",
    pubkey_hash_version: 0x00,
    wif_version: 0x80,
};

impl AddressCodec for P2pkhCodec {
    fn name(&self) -> &'static str {
        self.name
    }

    fn curve(&self) -> CurveFamily {
        CurveFamily::Secp256k1
    }

    fn encode_address(&self, public: &PublicPoint) -> Result<String, CodecError> {
        let key = secp256k1_key(self.name, public)?;
        let hash = hash160::Hash::hash(&key.serialize());

        let mut payload = Vec::with_capacity(21);
        payload.push(self.pubkey_hash_version);
        payload.extend_from_slice(hash.as_byte_array());
        Ok(base58::encode_check(&payload))
    }

    /// Compressed WIF: `version ‖ key ‖ 0x01`, Base58Check.
    fn encode_private_key(&self, scalar: &CurveScalar) -> Result<String, CodecError> {
        self.check_curve(scalar.curve())?;
        let mut payload = Zeroizing::new(Vec::with_capacity(34));
        payload.push(self.wif_version);
        payload.extend_from_slice(&scalar.to_be_bytes());
        payload.push(0x01);
        Ok(base58::encode_check(&payload))
    }
}
