//! Launch error types

use std::fmt;

use thiserror::Error;

/// Identifies one of the three independently submitted transactions of a launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchKind {
    /// Mint account creation, metadata pointer, mint and metadata initialisation
    Mint,
    /// Associated holding account creation
    AssociatedAccount,
    /// Initial supply issuance
    MintTo,
}

impl fmt::Display for BatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BatchKind::Mint => "mint",
            BatchKind::AssociatedAccount => "associated-account",
            BatchKind::MintTo => "mint-to",
        };
        f.write_str(name)
    }
}

/// Error returned by an external collaborator: image host, document host,
/// ledger connection or wallet
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Refusing to publish an empty payload")]
    EmptyPayload,

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Host returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Could not extract a URL from host response: {0}")]
    MissingUrl(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Signing error: {0}")]
    Signing(String),
}

impl From<solana_client::client_error::ClientError> for AdapterError {
    fn from(err: solana_client::client_error::ClientError) -> Self {
        AdapterError::Rpc(err.to_string())
    }
}

impl From<solana_sdk::signer::SignerError> for AdapterError {
    fn from(err: solana_sdk::signer::SignerError) -> Self {
        AdapterError::Signing(err.to_string())
    }
}

/// Launch workflow error
#[derive(Error, Debug)]
pub enum LaunchError {
    /// Request rejected before any stage ran
    #[error("Invalid launch request: {0}")]
    InvalidRequest(String),

    #[error("Image upload failed: {0}")]
    UploadFailure(#[source] AdapterError),

    #[error("Metadata publish failed: {0}")]
    MetadataPublishFailure(#[source] AdapterError),

    /// Metadata could not be packed or the mint account could not be sized
    #[error("Mint sizing failed: {0}")]
    SizingFailure(String),

    #[error("Failed to build {batch} batch: {reason}")]
    InstructionBuild { batch: BatchKind, reason: String },

    #[error("Submission of {batch} batch failed: {source}")]
    SubmissionFailure {
        batch: BatchKind,
        #[source]
        source: AdapterError,
    },
}

impl LaunchError {
    /// The batch this error belongs to, if it happened while building or submitting one
    pub fn batch(&self) -> Option<BatchKind> {
        match self {
            LaunchError::InstructionBuild { batch, .. }
            | LaunchError::SubmissionFailure { batch, .. } => Some(*batch),
            _ => None,
        }
    }
}

pub type LaunchResult<T> = Result<T, LaunchError>;
