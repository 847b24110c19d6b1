//! TON wallet v3r2 addresses
//!
//! A TON address is the representation hash of the wallet's StateInit cell,
//! so the wallet contract code and initial data are hashed here directly
//! instead of building a full cell tree.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use mpc_recovery_core::{CurveFamily, PublicPoint};
use sha2::{Digest, Sha256};

use crate::{ed25519_key, AddressCodec, CodecError};

/// Representation hash of the wallet v3r2 code cell
const WALLET_V3R2_CODE_HASH: [u8; 32] = [
    0x84, 0xda, 0xfa, 0x44, 0x9f, 0x98, 0xa6, 0x98, 0x77, 0x89, 0xba, 0x23, 0x23, 0x58, 0x07, 0x2b,
    0xc0, 0xf7, 0x6d, 0xc4, 0x52, 0x40, 0x02, 0xa5, 0xd0, 0x91, 0x8b, 0x9a, 0x75, 0xd2, 0xd5, 0x99,
];

/// The code cell has no references
const WALLET_V3R2_CODE_DEPTH: u16 = 0;

/// Default subwallet id for workchain 0 wallets
pub const DEFAULT_SUBWALLET_ID: u32 = 698_983_191;

/// User-friendly address flag: bounceable
const TAG_BOUNCEABLE: u8 = 0x11;

/// User-friendly address flag: non-bounceable
const TAG_NON_BOUNCEABLE: u8 = 0x51;

pub struct TonWalletCodec {
    pub subwallet_id: u32,
    pub workchain: i8,
    pub bounceable: bool,
}

pub const TON_WALLET_V3R2: TonWalletCodec = TonWalletCodec {
    subwallet_id: DEFAULT_SUBWALLET_ID,
    workchain: 0,
    bounceable: true,
};

impl TonWalletCodec {
    /// Hash of the data cell `seqno(32) ‖ subwallet_id(32) ‖ pubkey(256)`.
    fn data_cell_hash(&self, public_key: &[u8; 32]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        // d1: no refs, d2: 320 bits = 40 full bytes
        hasher.update([0x00, 0x50]);
        hasher.update(0u32.to_be_bytes());
        hasher.update(self.subwallet_id.to_be_bytes());
        hasher.update(public_key);
        hasher.finalize().into()
    }

    /// Hash of the StateInit cell with the code and data cells as its two refs.
    fn state_init_hash(&self, public_key: &[u8; 32]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        // d1: two refs, d2: 5 bits padded to one byte
        hasher.update([0x02, 0x01]);
        // split_depth:0 special:0 code:1 data:1 library:0, then completion bit
        hasher.update([0b0011_0100]);
        hasher.update(WALLET_V3R2_CODE_DEPTH.to_be_bytes());
        // data cell depth
        hasher.update(0u16.to_be_bytes());
        hasher.update(WALLET_V3R2_CODE_HASH);
        hasher.update(self.data_cell_hash(public_key));
        hasher.finalize().into()
    }
}

impl AddressCodec for TonWalletCodec {
    fn name(&self) -> &'static str {
        "ton"
    }

    fn curve(&self) -> CurveFamily {
        CurveFamily::Ed25519
    }

    /// `tag ‖ workchain ‖ hash ‖ crc16`, URL-safe base64.
    fn encode_address(&self, public: &PublicPoint) -> Result<String, CodecError> {
        let key = ed25519_key(self.name(), public)?;
        let hash = self.state_init_hash(&key);

        let mut raw = Vec::with_capacity(36);
        raw.push(if self.bounceable {
            TAG_BOUNCEABLE
        } else {
            TAG_NON_BOUNCEABLE
        });
        raw.push(self.workchain as u8);
        raw.extend_from_slice(&hash);
        let crc = crc16_xmodem(&raw);
        raw.extend_from_slice(&crc.to_be_bytes());

        Ok(URL_SAFE_NO_PAD.encode(raw))
    }
}

/// CRC-16/XMODEM (poly 0x1021, init 0)
fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for byte in data {
        crc ^= u16::from(*byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_points::generator;

    #[test]
    fn test_crc16_check_value() {
        assert_eq!(crc16_xmodem(b"123456789"), 0x31c3);
    }

    #[test]
    fn test_basepoint_wallet_address() {
        let b = generator(CurveFamily::Ed25519);
        let address = TON_WALLET_V3R2.encode_address(&b).unwrap();
        assert_eq!(address, "EQBRZlo5pHlOJ6WFrVpaVYhG_KpbpxoEegFKtAEVf1xlJGXe");
    }

    #[test]
    fn test_address_layout() {
        let b = generator(CurveFamily::Ed25519);
        let address = TON_WALLET_V3R2.encode_address(&b).unwrap();
        assert_eq!(address.len(), 48);

        let raw = URL_SAFE_NO_PAD.decode(&address).unwrap();
        assert_eq!(raw[0], TAG_BOUNCEABLE);
        assert_eq!(raw[1], 0);
        let key = b.as_ed25519().unwrap().compress().to_bytes();
        assert_eq!(&raw[2..34], &TON_WALLET_V3R2.state_init_hash(&key));
        assert_eq!(crc16_xmodem(&raw[..34]).to_be_bytes(), [raw[34], raw[35]]);
    }

    #[test]
    fn test_non_bounceable_flag() {
        let codec = TonWalletCodec {
            bounceable: false,
            ..TON_WALLET_V3R2
        };
        let address = codec
            .encode_address(&generator(CurveFamily::Ed25519))
            .unwrap();
        assert!(address.starts_with("UQ"));
    }

    #[test]
    fn test_subwallet_changes_address() {
        let b = generator(CurveFamily::Ed25519);
        let other = TonWalletCodec {
            subwallet_id: DEFAULT_SUBWALLET_ID + 1,
            ..TON_WALLET_V3R2
        };
        assert_ne!(
            other.encode_address(&b).unwrap(),
            TON_WALLET_V3R2.encode_address(&b).unwrap()
        );
    }
}
