use std::sync::Arc;

use solana_sdk::{
    message::Message, signature::Signature, signer::Signer, transaction::Transaction,
};
use tracing::{debug, info};

use crate::error::{LaunchError, LaunchResult};
use crate::instructions::TransactionBatch;
use crate::ledger::LedgerConnection;
use crate::wallet::Wallet;

/// Signs and submits batches through the connected wallet, one at a time
pub struct TransactionSubmitter {
    ledger: Arc<dyn LedgerConnection>,
    wallet: Arc<dyn Wallet>,
}

impl TransactionSubmitter {
    pub fn new(ledger: Arc<dyn LedgerConnection>, wallet: Arc<dyn Wallet>) -> Self {
        Self { ledger, wallet }
    }

    /// Attach a fresh blockhash and the wallet as fee payer, apply
    /// `co_signers`, then hand the transaction to the wallet for its signature
    /// and submission. Returns as soon as the wallet reports submission.
    pub async fn submit(
        &self,
        batch: &TransactionBatch,
        co_signers: &[&dyn Signer],
    ) -> LaunchResult<Signature> {
        let kind = batch.kind();
        let submission_err = |source| LaunchError::SubmissionFailure { batch: kind, source };

        let recent_blockhash = self.ledger.latest_blockhash().await.map_err(submission_err)?;

        let message = Message::new(batch.instructions(), Some(&self.wallet.pubkey()));
        let mut tx = Transaction::new_unsigned(message);
        tx.message.recent_blockhash = recent_blockhash;
        if !co_signers.is_empty() {
            tx.try_partial_sign(co_signers, recent_blockhash)
                .map_err(|e| submission_err(e.into()))?;
        }
        debug!(
            batch = %kind,
            instructions = batch.instructions().len(),
            co_signers = co_signers.len(),
            blockhash = %recent_blockhash,
            "Submitting batch"
        );

        let signature = self
            .wallet
            .sign_and_send(tx, self.ledger.as_ref())
            .await
            .map_err(submission_err)?;

        info!(batch = %kind, signature = %signature, "Batch submitted");
        Ok(signature)
    }
}
