//! Mint account sizing and rent funding

use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer};
use spl_token_2022::{
    extension::{ExtensionType, Length},
    state::Mint,
};
use tracing::debug;

use crate::error::{LaunchError, LaunchResult};
use crate::ledger::LedgerConnection;
use crate::metadata::TokenMetadata;

/// Size of the extension type tag in a Token-2022 TLV entry
pub const TYPE_SIZE: usize = std::mem::size_of::<ExtensionType>();
/// Size of the length prefix in a Token-2022 TLV entry
pub const LENGTH_SIZE: usize = std::mem::size_of::<Length>();

/// Extensions enabled on every launched mint
pub const MINT_EXTENSIONS: &[ExtensionType] = &[ExtensionType::MetadataPointer];

/// Freshly generated mint key pair.
///
/// Lives for a single launch attempt: it co-signs the mint creation batch and
/// is then dropped, leaving only its public key as the mint address.
pub struct MintKeypair(Keypair);

impl MintKeypair {
    pub fn generate() -> Self {
        Self(Keypair::new())
    }

    pub fn pubkey(&self) -> Pubkey {
        self.0.pubkey()
    }

    pub fn signer(&self) -> &dyn Signer {
        &self.0
    }
}

impl std::fmt::Debug for MintKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("MintKeypair").field(&self.pubkey()).finish()
    }
}

/// Byte lengths of a mint account carrying metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintSizing {
    /// Space allocated when the account is created
    pub account_len: usize,
    /// TLV entry the metadata record adds when it is initialised
    pub metadata_len: usize,
}

impl MintSizing {
    /// Length the account is funded for
    pub fn funded_len(&self) -> usize {
        self.account_len + self.metadata_len
    }
}

/// Everything needed to create the mint account for one launch attempt
#[derive(Debug)]
pub struct MintAccountPlan {
    pub mint_keypair: MintKeypair,
    pub sizing: MintSizing,
    pub rent_exempt_lamports: u64,
}

impl MintAccountPlan {
    pub fn mint(&self) -> Pubkey {
        self.mint_keypair.pubkey()
    }

    /// Drop the key pair, keeping the public half
    pub fn into_mint_address(self) -> Pubkey {
        self.mint_keypair.pubkey()
    }
}

pub struct MintAccountSizer;

impl MintAccountSizer {
    /// Base mint account plus the fixed-size extensions in [`MINT_EXTENSIONS`]
    pub fn account_len() -> LaunchResult<usize> {
        ExtensionType::try_calculate_account_len::<Mint>(MINT_EXTENSIONS)
            .map_err(|e| LaunchError::SizingFailure(format!("mint account length: {}", e)))
    }

    /// TLV entry length: type tag, length prefix and the record as the
    /// token-metadata interface packs it
    pub fn metadata_len(metadata: &TokenMetadata) -> LaunchResult<usize> {
        Ok(TYPE_SIZE + LENGTH_SIZE + metadata.packed_len()?)
    }

    pub fn measure(metadata: &TokenMetadata) -> LaunchResult<MintSizing> {
        Ok(MintSizing {
            account_len: Self::account_len()?,
            metadata_len: Self::metadata_len(metadata)?,
        })
    }

    /// Size the mint account for `metadata` and ask the ledger for its rent-exempt balance
    pub async fn plan(
        ledger: &dyn LedgerConnection,
        mint_keypair: MintKeypair,
        metadata: &TokenMetadata,
    ) -> LaunchResult<MintAccountPlan> {
        if metadata.mint() != mint_keypair.pubkey() {
            return Err(LaunchError::SizingFailure(format!(
                "metadata mint {} does not match generated mint {}",
                metadata.mint(),
                mint_keypair.pubkey()
            )));
        }

        let sizing = Self::measure(metadata)?;
        let rent_exempt_lamports = ledger
            .minimum_balance_for_rent_exemption(sizing.funded_len())
            .await
            .map_err(|e| LaunchError::SizingFailure(format!("rent exemption lookup: {}", e)))?;

        debug!(
            account_len = sizing.account_len,
            metadata_len = sizing.metadata_len,
            rent_exempt_lamports,
            "Sized mint account"
        );

        Ok(MintAccountPlan {
            mint_keypair,
            sizing,
            rent_exempt_lamports,
        })
    }
}
