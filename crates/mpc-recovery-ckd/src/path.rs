//! Derivation paths
//!
//! Recovery only ever walks non-hardened paths under purpose 81:
//! `81/0/{vault}/{coin}/0` for asset wallets and `81/1/0/{coin}/{index}` for
//! API wallets.

use std::fmt;
use std::str::FromStr;

use crate::types::{CkdError, HARDENED_KEY_START};

pub const PURPOSE: u32 = 81;
pub const ASSET_WALLET: u32 = 0;
pub const API_WALLET: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivationPath(Vec<u32>);

impl DerivationPath {
    /// Build a path, rejecting empty paths and hardened components.
    pub fn new(indices: Vec<u32>) -> Result<Self, CkdError> {
        if indices.is_empty() {
            return Err(CkdError::InvalidPath("empty path".into()));
        }
        if let Some(&hardened) = indices.iter().find(|&&i| i >= HARDENED_KEY_START) {
            return Err(CkdError::HardenedIndex(hardened));
        }
        Ok(Self(indices))
    }

    /// `81/0/{vault_index}/{coin_type}/0`. `vault_index` is zero-based here.
    pub fn asset_wallet(vault_index: u32, coin_type: u32) -> Result<Self, CkdError> {
        Self::new(vec![PURPOSE, ASSET_WALLET, vault_index, coin_type, 0])
    }

    /// `81/1/0/{coin_type}/{address_index}`.
    pub fn api_wallet(coin_type: u32, address_index: u32) -> Result<Self, CkdError> {
        Self::new(vec![PURPOSE, API_WALLET, 0, coin_type, address_index])
    }

    pub fn indices(&self) -> &[u32] {
        &self.0
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", index)?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = CkdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let body = trimmed.strip_prefix("m/").unwrap_or(trimmed);
        let indices = body
            .split('/')
            .map(|component| {
                if component.ends_with('\'') || component.ends_with('h') {
                    return Err(CkdError::InvalidPath(format!(
                        "hardened component {:?} in {:?}",
                        component, s
                    )));
                }
                component
                    .parse::<u32>()
                    .map_err(|_| CkdError::InvalidPath(format!("bad component {:?} in {:?}", component, s)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(indices)
    }
}
