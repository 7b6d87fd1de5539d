//! Token metadata record stored inside the mint account

use solana_sdk::pubkey::Pubkey;
use spl_token_metadata_interface::state::TokenMetadata as MetadataRecord;
use spl_type_length_value::variable_len_pack::VariableLenPack;

use crate::error::{LaunchError, LaunchResult};
use crate::types::{SYMBOL_PAD, SYMBOL_WIDTH};

/// Right-pad `symbol` with blanks to exactly `width` bytes.
///
/// Symbols already `width` bytes long are returned unchanged. Longer symbols
/// are rejected, never truncated.
pub fn pad_symbol(symbol: &str, width: usize) -> LaunchResult<String> {
    if symbol.len() > width {
        return Err(LaunchError::SizingFailure(format!(
            "symbol {:?} is {} bytes, wider than {}",
            symbol,
            symbol.len(),
            width
        )));
    }
    let mut padded = String::with_capacity(width);
    padded.push_str(symbol);
    padded.extend(std::iter::repeat(SYMBOL_PAD).take(width - symbol.len()));
    Ok(padded)
}

/// Metadata record as initialised in the mint account by the token program.
///
/// Wraps the token-metadata interface record so that every instance carries a
/// padded symbol, a non-empty name and uri, and an update authority.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenMetadata {
    record: MetadataRecord,
}

impl TokenMetadata {
    /// Build the record, padding `symbol` to [`SYMBOL_WIDTH`]
    pub fn new(
        update_authority: Pubkey,
        mint: Pubkey,
        name: &str,
        symbol: &str,
        uri: &str,
    ) -> LaunchResult<Self> {
        if name.is_empty() || uri.is_empty() {
            return Err(LaunchError::SizingFailure(
                "metadata name and uri must not be empty".to_string(),
            ));
        }
        let update_authority = Some(update_authority)
            .try_into()
            .map_err(|_| {
                LaunchError::SizingFailure("update authority must not be the default key".to_string())
            })?;

        Ok(Self {
            record: MetadataRecord {
                update_authority,
                mint,
                name: name.to_string(),
                symbol: pad_symbol(symbol, SYMBOL_WIDTH)?,
                uri: uri.to_string(),
                additional_metadata: Vec::new(),
            },
        })
    }

    pub fn update_authority(&self) -> Option<Pubkey> {
        self.record.update_authority.into()
    }

    pub fn mint(&self) -> Pubkey {
        self.record.mint
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// The padded symbol
    pub fn symbol(&self) -> &str {
        &self.record.symbol
    }

    pub fn uri(&self) -> &str {
        &self.record.uri
    }

    pub fn additional_metadata(&self) -> &[(String, String)] {
        &self.record.additional_metadata
    }

    /// The interface record the token program stores
    pub fn record(&self) -> &MetadataRecord {
        &self.record
    }

    /// Length of the record as the token program serializes it
    pub fn packed_len(&self) -> LaunchResult<usize> {
        self.record
            .get_packed_len()
            .map_err(|e| LaunchError::SizingFailure(format!("failed to measure metadata: {}", e)))
    }

    /// Serialize the record exactly as the token program stores it
    pub fn pack(&self) -> LaunchResult<Vec<u8>> {
        let mut packed = vec![0u8; self.packed_len()?];
        self.record
            .pack_into_slice(&mut packed)
            .map_err(|e| LaunchError::SizingFailure(format!("failed to pack metadata: {}", e)))?;
        Ok(packed)
    }
}
