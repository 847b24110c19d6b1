//! Chain registry
//!
//! Every supported chain with its BIP-44 coin type, curve and codec. Several
//! EVM networks share coin type 60 and therefore share keys and addresses.

use mpc_recovery_core::CurveFamily;

use crate::eddsa::{AptosCodec, SolanaCodec, POLKADOT};
use crate::evm::{EvmCodec, TronCodec};
use crate::ton::TON_WALLET_V3R2;
use crate::utxo::{BITCOIN, BITCOIN_CASH, DOGECOIN, LITECOIN};
use crate::{AddressCodec, CodecError};

/// BIP-44 coin types (SLIP-0044)
pub mod coin_type {
    pub const BITCOIN: u32 = 0;
    pub const LITECOIN: u32 = 2;
    pub const DOGECOIN: u32 = 3;
    pub const ETHEREUM: u32 = 60;
    pub const BITCOIN_CASH: u32 = 145;
    pub const TRON: u32 = 195;
    pub const POLKADOT: u32 = 354;
    pub const SOLANA: u32 = 501;
    pub const TON: u32 = 607;
    pub const APTOS: u32 = 637;
}

/// Coin types derived on Ed25519; everything else is secp256k1.
pub const EDDSA_COIN_TYPES: [u32; 4] = [
    coin_type::POLKADOT,
    coin_type::SOLANA,
    coin_type::TON,
    coin_type::APTOS,
];

pub struct ChainInfo {
    /// Canonical display name
    pub name: &'static str,
    /// Short alias accepted in input
    pub symbol: &'static str,
    pub coin_type: u32,
    pub codec: &'static dyn AddressCodec,
}

impl ChainInfo {
    pub fn curve(&self) -> CurveFamily {
        curve_for_coin_type(self.coin_type)
    }
}

impl std::fmt::Debug for ChainInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainInfo")
            .field("name", &self.name)
            .field("coin_type", &self.coin_type)
            .finish()
    }
}

static CHAINS: [ChainInfo; 15] = [
    ChainInfo {
        name: "Bitcoin",
        symbol: "btc",
        coin_type: coin_type::BITCOIN,
        codec: &BITCOIN,
    },
    ChainInfo {
        name: "Ethereum",
        symbol: "eth",
        coin_type: coin_type::ETHEREUM,
        codec: &EvmCodec,
    },
    ChainInfo {
        name: "Tron",
        symbol: "trx",
        coin_type: coin_type::TRON,
        codec: &TronCodec,
    },
    ChainInfo {
        name: "BSC",
        symbol: "bsc",
        coin_type: coin_type::ETHEREUM,
        codec: &EvmCodec,
    },
    ChainInfo {
        name: "Bitcoin Cash",
        symbol: "bch",
        coin_type: coin_type::BITCOIN_CASH,
        codec: &BITCOIN_CASH,
    },
    ChainInfo {
        name: "Doge",
        symbol: "doge",
        coin_type: coin_type::DOGECOIN,
        codec: &DOGECOIN,
    },
    ChainInfo {
        name: "Litecoin",
        symbol: "ltc",
        coin_type: coin_type::LITECOIN,
        codec: &LITECOIN,
    },
    ChainInfo {
        name: "Heco",
        symbol: "heco",
        coin_type: coin_type::ETHEREUM,
        codec: &EvmCodec,
    },
    ChainInfo {
        name: "Polygon",
        symbol: "polygon",
        coin_type: coin_type::ETHEREUM,
        codec: &EvmCodec,
    },
    ChainInfo {
        name: "Arbitrum",
        symbol: "arbitrum",
        coin_type: coin_type::ETHEREUM,
        codec: &EvmCodec,
    },
    ChainInfo {
        name: "Polkadot",
        symbol: "dot",
        coin_type: coin_type::POLKADOT,
        codec: &POLKADOT,
    },
    ChainInfo {
        name: "Aptos",
        symbol: "apt",
        coin_type: coin_type::APTOS,
        codec: &AptosCodec,
    },
    ChainInfo {
        name: "Solana",
        symbol: "sol",
        coin_type: coin_type::SOLANA,
        codec: &SolanaCodec,
    },
    ChainInfo {
        name: "Base Chain",
        symbol: "base",
        coin_type: coin_type::ETHEREUM,
        codec: &EvmCodec,
    },
    ChainInfo {
        name: "TON",
        symbol: "ton",
        coin_type: coin_type::TON,
        codec: &TON_WALLET_V3R2,
    },
];

/// All supported chains in display order.
pub fn supported_chains() -> &'static [ChainInfo] {
    &CHAINS
}

/// Resolve a chain by name or symbol, case-insensitively.
pub fn lookup_chain(name: &str) -> Result<&'static ChainInfo, CodecError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CodecError::EmptyChainName);
    }
    CHAINS
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name) || c.symbol.eq_ignore_ascii_case(name))
        .ok_or_else(|| CodecError::UnsupportedChain(name.to_string()))
}

pub fn curve_for_coin_type(coin_type: u32) -> CurveFamily {
    if EDDSA_COIN_TYPES.contains(&coin_type) {
        CurveFamily::Ed25519
    } else {
        CurveFamily::Secp256k1
    }
}

/// Codec for a coin type. Chains sharing a coin type share a codec.
pub fn codec_for_coin_type(coin_type: u32) -> Result<&'static dyn AddressCodec, CodecError> {
    CHAINS
        .iter()
        .find(|c| c.coin_type == coin_type)
        .map(|c| c.codec)
        .ok_or(CodecError::UnknownCoinType(coin_type))
}
