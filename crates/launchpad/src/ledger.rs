use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, signature::Signature,
    transaction::Transaction,
};

use crate::error::AdapterError;

/// Read and submit operations the launch needs from the ledger
#[async_trait]
pub trait LedgerConnection: Send + Sync {
    /// Minimum balance for an account of `data_len` bytes to be rent exempt
    async fn minimum_balance_for_rent_exemption(&self, data_len: usize)
        -> Result<u64, AdapterError>;

    /// Recent blockhash to anchor a transaction to
    async fn latest_blockhash(&self) -> Result<Hash, AdapterError>;

    /// Broadcast a fully signed transaction
    async fn send_transaction(&self, tx: &Transaction) -> Result<Signature, AdapterError>;
}

/// JSON-RPC ledger connection
pub struct RpcLedger {
    rpc: RpcClient,
    await_confirmation: bool,
}

impl RpcLedger {
    pub fn new(rpc_url: &str, commitment: CommitmentConfig) -> Self {
        Self {
            rpc: RpcClient::new_with_commitment(rpc_url.to_string(), commitment),
            await_confirmation: false,
        }
    }

    /// Wait for confirmation after each submission instead of returning right away
    pub fn with_confirmation(mut self, await_confirmation: bool) -> Self {
        self.await_confirmation = await_confirmation;
        self
    }
}

#[async_trait]
impl LedgerConnection for RpcLedger {
    async fn minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, AdapterError> {
        Ok(self
            .rpc
            .get_minimum_balance_for_rent_exemption(data_len)
            .await?)
    }

    async fn latest_blockhash(&self) -> Result<Hash, AdapterError> {
        Ok(self.rpc.get_latest_blockhash().await?)
    }

    async fn send_transaction(&self, tx: &Transaction) -> Result<Signature, AdapterError> {
        let signature = if self.await_confirmation {
            self.rpc.send_and_confirm_transaction(tx).await?
        } else {
            self.rpc.send_transaction(tx).await?
        };
        Ok(signature)
    }
}
