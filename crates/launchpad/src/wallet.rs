use async_trait::async_trait;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};

use crate::error::AdapterError;
use crate::ledger::LedgerConnection;

/// Connected wallet: a public identity plus submit-with-signature
#[async_trait]
pub trait Wallet: Send + Sync {
    fn pubkey(&self) -> Pubkey;

    /// Add the wallet signature to `tx` and submit it through `ledger`.
    ///
    /// `tx` already carries its fee payer, recent blockhash and any co-signatures.
    async fn sign_and_send(
        &self,
        tx: Transaction,
        ledger: &dyn LedgerConnection,
    ) -> Result<Signature, AdapterError>;
}

/// Wallet backed by a local keypair
pub struct KeypairWallet {
    keypair: Keypair,
}

impl KeypairWallet {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }
}

#[async_trait]
impl Wallet for KeypairWallet {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn sign_and_send(
        &self,
        mut tx: Transaction,
        ledger: &dyn LedgerConnection,
    ) -> Result<Signature, AdapterError> {
        let recent_blockhash = tx.message.recent_blockhash;
        tx.try_partial_sign(&[&self.keypair], recent_blockhash)?;
        if !tx.is_signed() {
            return Err(AdapterError::Signing(
                "transaction is missing required signatures".to_string(),
            ));
        }
        ledger.send_transaction(&tx).await
    }
}
