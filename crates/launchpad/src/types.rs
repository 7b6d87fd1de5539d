use solana_sdk::{pubkey::Pubkey, signature::Signature};

use crate::error::{LaunchError, LaunchResult};

/// Decimal precision of every launched mint
pub const MINT_DECIMALS: u8 = 9;

/// Byte width the on-chain symbol is padded to
pub const SYMBOL_WIDTH: usize = 8;

/// Character used to pad symbols up to [`SYMBOL_WIDTH`]
pub const SYMBOL_PAD: char = ' ';

/// Validated user input for one launch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    name: String,
    symbol: String,
    image: Vec<u8>,
    initial_supply: u64,
}

impl LaunchRequest {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        image: Vec<u8>,
        initial_supply: u64,
    ) -> LaunchResult<Self> {
        let name = name.into();
        let symbol = symbol.into();

        if name.trim().is_empty() {
            return Err(LaunchError::InvalidRequest("name must not be empty".to_string()));
        }
        if symbol.trim().is_empty() {
            return Err(LaunchError::InvalidRequest("symbol must not be empty".to_string()));
        }
        if symbol.len() > SYMBOL_WIDTH {
            return Err(LaunchError::InvalidRequest(format!(
                "symbol {:?} is {} bytes, at most {} allowed",
                symbol,
                symbol.len(),
                SYMBOL_WIDTH
            )));
        }
        if image.is_empty() {
            return Err(LaunchError::InvalidRequest("please upload an image".to_string()));
        }
        if initial_supply == 0 {
            return Err(LaunchError::InvalidRequest(
                "initial supply must be at least 1".to_string(),
            ));
        }
        if base_units(initial_supply).is_none() {
            return Err(LaunchError::InvalidRequest(format!(
                "initial supply {} overflows at {} decimals",
                initial_supply, MINT_DECIMALS
            )));
        }

        Ok(Self {
            name,
            symbol,
            image,
            initial_supply,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn image(&self) -> &[u8] {
        &self.image
    }

    pub fn initial_supply(&self) -> u64 {
        self.initial_supply
    }

    /// Initial supply scaled to base units
    pub fn supply_base_units(&self) -> u64 {
        // Checked at construction
        base_units(self.initial_supply).unwrap_or(u64::MAX)
    }
}

/// Scale a whole-token amount to base units at [`MINT_DECIMALS`]
pub fn base_units(whole_tokens: u64) -> Option<u64> {
    10u64
        .checked_pow(MINT_DECIMALS as u32)
        .and_then(|scale| whole_tokens.checked_mul(scale))
}

/// Publicly fetchable image produced by the image host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub url: String,
}

/// Everything a completed launch leaves behind
#[derive(Debug, Clone)]
pub struct LaunchReceipt {
    pub mint: Pubkey,
    pub associated_account: Pubkey,
    pub image_url: String,
    pub metadata_uri: String,
    pub minted_base_units: u64,
    pub mint_signature: Signature,
    pub associated_account_signature: Signature,
    pub mint_to_signature: Signature,
}
