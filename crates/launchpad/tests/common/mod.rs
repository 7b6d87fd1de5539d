//! In-memory collaborators for driving launches without a network

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use solana_sdk::{
    hash::Hash, signature::Keypair, signature::Signature, transaction::Transaction,
};

use launchpad::{
    AdapterError, DocumentHost, ImageHost, KeypairWallet, LaunchWorkflow, LedgerConnection,
    MetadataPublisher,
};

pub const IMAGE_URL: &str = "https://i.ibb.co/demo/logo.png";
pub const RAW_URL: &str = "https://gist.githubusercontent.com/demo/abc123/raw/metadata.json";

pub struct FakeImageHost {
    pub fail_with_status: Option<u16>,
    pub calls: AtomicUsize,
}

impl FakeImageHost {
    pub fn ok() -> Self {
        Self {
            fail_with_status: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ImageHost for FakeImageHost {
    fn name(&self) -> &'static str {
        "fake-images"
    }

    async fn upload(&self, _image: &[u8]) -> Result<String, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_with_status {
            Some(status) => Err(AdapterError::Status {
                status,
                body: "upload rejected".to_string(),
            }),
            None => Ok(IMAGE_URL.to_string()),
        }
    }
}

/// Document host answering with a canned response body
pub struct FakeDocumentHost {
    response_body: String,
    pub published: Mutex<Vec<(String, String)>>,
}

impl FakeDocumentHost {
    pub fn ok() -> Self {
        Self::with_response(&format!(
            r#"{{"files": {{"metadata.json": {{"raw_url": "{}"}}}}}}"#,
            RAW_URL
        ))
    }

    pub fn with_response(body: &str) -> Self {
        Self {
            response_body: body.to_string(),
            published: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.published.lock().unwrap().len()
    }
}

#[async_trait]
impl DocumentHost for FakeDocumentHost {
    fn name(&self) -> &'static str {
        "fake-documents"
    }

    async fn publish(&self, file_name: &str, content: &str) -> Result<String, AdapterError> {
        self.published
            .lock()
            .unwrap()
            .push((file_name.to_string(), content.to_string()));
        launchpad::hosts::gist::extract_raw_url(&self.response_body)
    }
}

/// Ledger that records what it is asked and accepts transactions until
/// `fail_send_at` submissions have succeeded
pub struct FakeLedger {
    pub fail_send_at: Option<usize>,
    pub fail_rent: bool,
    pub rent_requests: Mutex<Vec<usize>>,
    pub blockhashes: Mutex<Vec<Hash>>,
    pub sent: Mutex<Vec<Transaction>>,
}

impl FakeLedger {
    pub fn new() -> Self {
        Self {
            fail_send_at: None,
            fail_rent: false,
            rent_requests: Mutex::new(Vec::new()),
            blockhashes: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_send_at(index: usize) -> Self {
        Self {
            fail_send_at: Some(index),
            ..Self::new()
        }
    }

    pub fn failing_rent() -> Self {
        Self {
            fail_rent: true,
            ..Self::new()
        }
    }

    pub fn sent(&self) -> Vec<Transaction> {
        self.sent.lock().unwrap().clone()
    }

    /// Rent-exempt minimum with the default rent parameters
    pub fn rent_for(data_len: usize) -> u64 {
        (128 + data_len as u64) * 3480 * 2
    }
}

#[async_trait]
impl LedgerConnection for FakeLedger {
    async fn minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, AdapterError> {
        if self.fail_rent {
            return Err(AdapterError::Rpc("connection refused".to_string()));
        }
        self.rent_requests.lock().unwrap().push(data_len);
        Ok(Self::rent_for(data_len))
    }

    async fn latest_blockhash(&self) -> Result<Hash, AdapterError> {
        let hash = Hash::new_unique();
        self.blockhashes.lock().unwrap().push(hash);
        Ok(hash)
    }

    async fn send_transaction(&self, tx: &Transaction) -> Result<Signature, AdapterError> {
        let mut sent = self.sent.lock().unwrap();
        if self.fail_send_at == Some(sent.len()) {
            return Err(AdapterError::Rpc("Blockhash not found".to_string()));
        }
        sent.push(tx.clone());
        Ok(tx.signatures[0])
    }
}

pub struct Harness {
    pub images: Arc<FakeImageHost>,
    pub documents: Arc<FakeDocumentHost>,
    pub ledger: Arc<FakeLedger>,
    pub wallet: Keypair,
    pub workflow: LaunchWorkflow,
}

impl Harness {
    pub fn new(images: FakeImageHost, documents: FakeDocumentHost, ledger: FakeLedger) -> Self {
        let images = Arc::new(images);
        let documents = Arc::new(documents);
        let ledger = Arc::new(ledger);
        let wallet = Keypair::new();
        let workflow = LaunchWorkflow::new(
            images.clone(),
            MetadataPublisher::new(documents.clone()),
            ledger.clone(),
            Arc::new(KeypairWallet::new(wallet.insecure_clone())),
        );
        Self {
            images,
            documents,
            ledger,
            wallet,
            workflow,
        }
    }

    pub fn happy() -> Self {
        Self::new(FakeImageHost::ok(), FakeDocumentHost::ok(), FakeLedger::new())
    }
}
