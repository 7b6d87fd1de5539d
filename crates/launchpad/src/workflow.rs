//! Launch orchestration
//!
//! A launch walks a fixed sequence of stages. The first error stops it; nothing
//! is retried or rolled back. Once the mint batch has been submitted the mint
//! exists on-chain, so a later failure ends in [`LaunchOutcome::PartiallyLaunched`]
//! rather than [`LaunchOutcome::Failed`].

use std::fmt;
use std::sync::Arc;

use solana_sdk::pubkey::Pubkey;
use tracing::{error, info};

use crate::error::{LaunchError, LaunchResult};
use crate::hosts::ImageHost;
use crate::instructions::MintTransactionBuilder;
use crate::ledger::LedgerConnection;
use crate::metadata::TokenMetadata;
use crate::publisher::{AssetPublisher, MetadataPublisher};
use crate::sizing::{MintAccountSizer, MintKeypair};
use crate::submitter::TransactionSubmitter;
use crate::types::{LaunchReceipt, LaunchRequest};
use crate::wallet::Wallet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaunchStage {
    Idle,
    UploadingImage,
    PublishingMetadata,
    SizingMint,
    SubmittingMintBatch,
    SubmittingAssociatedAccountBatch,
    SubmittingMintToBatch,
    Complete,
}

impl LaunchStage {
    /// The only stage a launch may move to from this one
    pub fn next(self) -> Option<LaunchStage> {
        use LaunchStage::*;
        match self {
            Idle => Some(UploadingImage),
            UploadingImage => Some(PublishingMetadata),
            PublishingMetadata => Some(SizingMint),
            SizingMint => Some(SubmittingMintBatch),
            SubmittingMintBatch => Some(SubmittingAssociatedAccountBatch),
            SubmittingAssociatedAccountBatch => Some(SubmittingMintToBatch),
            SubmittingMintToBatch => Some(Complete),
            Complete => None,
        }
    }
}

impl fmt::Display for LaunchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LaunchStage::Idle => "idle",
            LaunchStage::UploadingImage => "uploading image",
            LaunchStage::PublishingMetadata => "publishing metadata",
            LaunchStage::SizingMint => "sizing mint",
            LaunchStage::SubmittingMintBatch => "submitting mint batch",
            LaunchStage::SubmittingAssociatedAccountBatch => "submitting associated account batch",
            LaunchStage::SubmittingMintToBatch => "submitting mint-to batch",
            LaunchStage::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Terminal state of a launch
#[derive(Debug)]
pub enum LaunchOutcome {
    Complete(LaunchReceipt),
    /// Stopped before the mint creation batch was accepted.
    ///
    /// `mint` is set when the mint batch itself failed: the ledger may still
    /// have processed it, e.g. when confirmation timed out after broadcast.
    Failed {
        stage: LaunchStage,
        mint: Option<Pubkey>,
        error: LaunchError,
    },
    /// The mint exists on-chain but a later batch failed
    PartiallyLaunched {
        mint: Pubkey,
        stage: LaunchStage,
        error: LaunchError,
    },
}

impl LaunchOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, LaunchOutcome::Complete(_))
    }

    pub fn receipt(&self) -> Option<&LaunchReceipt> {
        match self {
            LaunchOutcome::Complete(receipt) => Some(receipt),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&LaunchError> {
        match self {
            LaunchOutcome::Complete(_) => None,
            LaunchOutcome::Failed { error, .. } | LaunchOutcome::PartiallyLaunched { error, .. } => {
                Some(error)
            }
        }
    }

    /// Stage the launch stopped at
    pub fn stage(&self) -> LaunchStage {
        match self {
            LaunchOutcome::Complete(_) => LaunchStage::Complete,
            LaunchOutcome::Failed { stage, .. } | LaunchOutcome::PartiallyLaunched { stage, .. } => {
                *stage
            }
        }
    }

    /// One-line notification for the user
    pub fn notification(&self) -> String {
        match self {
            LaunchOutcome::Complete(receipt) => {
                format!("Token launched successfully! Mint: {}", receipt.mint)
            }
            LaunchOutcome::Failed {
                stage,
                mint: Some(mint),
                error,
            } => format!(
                "Launch failed while {}: {} (mint {} may exist on-chain)",
                stage, error, mint
            ),
            LaunchOutcome::Failed { stage, error, .. } => {
                format!("Launch failed while {}: {}", stage, error)
            }
            LaunchOutcome::PartiallyLaunched { mint, stage, error } => format!(
                "Launch partially completed: mint {} exists on-chain but failed while {}: {}",
                mint, stage, error
            ),
        }
    }
}

/// Launch result plus the stages it went through
#[derive(Debug)]
pub struct LaunchReport {
    pub outcome: LaunchOutcome,
    pub stages: Vec<LaunchStage>,
}

/// Tracks the current stage and whether the mint has reached the ledger
#[derive(Debug)]
struct LaunchMachine {
    stage: LaunchStage,
    stages: Vec<LaunchStage>,
    pending_mint: Option<Pubkey>,
    mint: Option<Pubkey>,
}

impl LaunchMachine {
    fn new() -> Self {
        Self {
            stage: LaunchStage::Idle,
            stages: vec![LaunchStage::Idle],
            pending_mint: None,
            mint: None,
        }
    }

    fn advance(&mut self, to: LaunchStage) {
        debug_assert_eq!(self.stage.next(), Some(to), "launch stages out of order");
        self.stage = to;
        self.stages.push(to);
        info!(stage = %to, "Launch stage");
    }

    fn mint_pending(&mut self, mint: Pubkey) {
        self.pending_mint = Some(mint);
    }

    fn mint_submitted(&mut self, mint: Pubkey) {
        self.pending_mint = None;
        self.mint = Some(mint);
    }

    fn complete(mut self, receipt: LaunchReceipt) -> LaunchReport {
        self.advance(LaunchStage::Complete);
        LaunchReport {
            outcome: LaunchOutcome::Complete(receipt),
            stages: self.stages,
        }
    }

    fn fail(self, error: LaunchError) -> LaunchReport {
        let stage = self.stage;
        let outcome = match self.mint {
            Some(mint) => {
                error!(stage = %stage, mint = %mint, error = %error, "Launch stopped after mint creation");
                LaunchOutcome::PartiallyLaunched { mint, stage, error }
            }
            None => {
                error!(stage = %stage, error = %error, "Launch failed");
                LaunchOutcome::Failed {
                    stage,
                    mint: self.pending_mint,
                    error,
                }
            }
        };
        LaunchReport {
            outcome,
            stages: self.stages,
        }
    }
}

/// Runs launches against a fixed set of collaborators
pub struct LaunchWorkflow {
    assets: AssetPublisher,
    metadata: MetadataPublisher,
    ledger: Arc<dyn LedgerConnection>,
    submitter: TransactionSubmitter,
    builder: MintTransactionBuilder,
}

impl LaunchWorkflow {
    pub fn new(
        image_host: Arc<dyn ImageHost>,
        metadata: MetadataPublisher,
        ledger: Arc<dyn LedgerConnection>,
        wallet: Arc<dyn Wallet>,
    ) -> Self {
        let builder = MintTransactionBuilder::new(wallet.pubkey());
        Self {
            assets: AssetPublisher::new(image_host),
            metadata,
            submitter: TransactionSubmitter::new(ledger.clone(), wallet),
            ledger,
            builder,
        }
    }

    /// Run one launch attempt to a terminal state
    pub async fn launch(&self, request: &LaunchRequest) -> LaunchReport {
        let mut machine = LaunchMachine::new();
        match self.drive(request, &mut machine).await {
            Ok(receipt) => machine.complete(receipt),
            Err(error) => machine.fail(error),
        }
    }

    async fn drive(
        &self,
        request: &LaunchRequest,
        machine: &mut LaunchMachine,
    ) -> LaunchResult<LaunchReceipt> {
        let authority = self.builder.authority();
        info!(
            name = request.name(),
            symbol = request.symbol(),
            supply = request.initial_supply(),
            authority = %authority,
            "Starting launch"
        );

        machine.advance(LaunchStage::UploadingImage);
        let image = self.assets.publish(request.image()).await?;

        machine.advance(LaunchStage::PublishingMetadata);
        let metadata_uri = self.metadata.publish(request, &image).await?;

        machine.advance(LaunchStage::SizingMint);
        let mint_keypair = MintKeypair::generate();
        let metadata = TokenMetadata::new(
            authority,
            mint_keypair.pubkey(),
            request.name(),
            request.symbol(),
            &metadata_uri,
        )?;
        let plan = MintAccountSizer::plan(self.ledger.as_ref(), mint_keypair, &metadata).await?;

        machine.advance(LaunchStage::SubmittingMintBatch);
        let mint_batch = self.builder.mint_batch(&plan, &metadata)?;
        machine.mint_pending(plan.mint());
        let mint_signature = self
            .submitter
            .submit(mint_batch.batch(), &[plan.mint_keypair.signer()])
            .await?;
        let mint = plan.into_mint_address();
        machine.mint_submitted(mint);
        info!(mint = %mint, "Token mint created");

        machine.advance(LaunchStage::SubmittingAssociatedAccountBatch);
        let account_batch = self.builder.associated_account_batch(&mint_batch);
        let associated_account_signature = self.submitter.submit(account_batch.batch(), &[]).await?;

        machine.advance(LaunchStage::SubmittingMintToBatch);
        let mint_to_batch = self
            .builder
            .mint_to_batch(&account_batch, request.supply_base_units())?;
        let mint_to_signature = self.submitter.submit(mint_to_batch.batch(), &[]).await?;

        Ok(LaunchReceipt {
            mint,
            associated_account: account_batch.associated_account(),
            image_url: image.url,
            metadata_uri,
            minted_base_units: mint_to_batch.amount(),
            mint_signature,
            associated_account_signature,
            mint_to_signature,
        })
    }
}
