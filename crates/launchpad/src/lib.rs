/// Token launchpad
///
/// Launches a Token-2022 fungible token with on-chain metadata from a
/// connected wallet:
/// - Image upload to a public image host
/// - Metadata document publishing to a public document host
/// - Mint account sizing and rent funding
/// - Mint, associated account and mint-to transactions
pub mod config;
pub mod error;
pub mod hosts;
pub mod instructions;
pub mod ledger;
pub mod metadata;
pub mod publisher;
pub mod sizing;
pub mod submitter;
pub mod types;
pub mod wallet;
pub mod workflow;

pub use config::LaunchConfig;
pub use error::*;
pub use hosts::{DocumentHost, GistHost, ImageHost, ImgBbHost};
pub use instructions::{
    get_token_2022_account, AssociatedAccountBatch, MintBatch, MintToBatch,
    MintTransactionBuilder, TransactionBatch,
};
pub use ledger::{LedgerConnection, RpcLedger};
pub use metadata::{pad_symbol, TokenMetadata};
pub use publisher::{AssetPublisher, MetadataDocument, MetadataPublisher};
pub use sizing::{MintAccountPlan, MintAccountSizer, MintKeypair, MintSizing};
pub use submitter::TransactionSubmitter;
pub use types::*;
pub use wallet::{KeypairWallet, Wallet};
pub use workflow::{LaunchOutcome, LaunchReport, LaunchStage, LaunchWorkflow};
