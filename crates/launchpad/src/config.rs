//! Launchpad configuration

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentConfig;
use validator::Validate;

use crate::hosts::gist::GIST_ENDPOINT;
use crate::hosts::imgbb::IMGBB_UPLOAD_ENDPOINT;
use crate::publisher::{DEFAULT_METADATA_FILE_NAME, DEFAULT_TOKEN_DESCRIPTION};

pub const ENV_IMGBB_API_KEY: &str = "LAUNCHPAD_IMGBB_API_KEY";
pub const ENV_GITHUB_TOKEN: &str = "LAUNCHPAD_GITHUB_TOKEN";
pub const ENV_RPC_URL: &str = "LAUNCHPAD_RPC_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LaunchConfig {
    pub ledger: LedgerConfig,
    pub image_host: ImageHostConfig,
    pub document_host: DocumentHostConfig,
    pub token: TokenConfig,
    pub http: HttpConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LedgerConfig {
    #[validate(url)]
    pub rpc_url: String,
    /// processed, confirmed or finalized
    pub commitment: String,
    /// Wait for confirmation after each batch instead of moving on once submitted
    pub await_confirmation: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ImageHostConfig {
    #[validate(url)]
    pub endpoint: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DocumentHostConfig {
    #[validate(url)]
    pub endpoint: String,
    pub token: String,
    pub description: String,
    pub public: bool,
    #[validate(length(min = 1))]
    pub file_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Description written into the metadata document
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct HttpConfig {
    #[validate(range(min = 1, max = 600))]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub log_level: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            commitment: "confirmed".to_string(),
            await_confirmation: false,
        }
    }
}

impl Default for ImageHostConfig {
    fn default() -> Self {
        Self {
            endpoint: IMGBB_UPLOAD_ENDPOINT.to_string(),
            api_key: String::new(),
        }
    }
}

impl Default for DocumentHostConfig {
    fn default() -> Self {
        Self {
            endpoint: GIST_ENDPOINT.to_string(),
            token: String::new(),
            description: "Token Metadata JSON uploaded via launchpad".to_string(),
            public: true,
            file_name: DEFAULT_METADATA_FILE_NAME.to_string(),
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            description: DEFAULT_TOKEN_DESCRIPTION.to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl LedgerConfig {
    pub fn commitment_config(&self) -> Result<CommitmentConfig> {
        match self.commitment.as_str() {
            "processed" => Ok(CommitmentConfig::processed()),
            "confirmed" => Ok(CommitmentConfig::confirmed()),
            "finalized" => Ok(CommitmentConfig::finalized()),
            other => bail!("Unknown commitment level: {}", other),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl LaunchConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from `path` if it exists, defaults otherwise, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = if path.as_ref().exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override secrets and the RPC endpoint from the environment
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());
        if let Some(key) = non_empty(ENV_IMGBB_API_KEY) {
            self.image_host.api_key = key;
        }
        if let Some(token) = non_empty(ENV_GITHUB_TOKEN) {
            self.document_host.token = token;
        }
        if let Some(url) = non_empty(ENV_RPC_URL) {
            self.ledger.rpc_url = url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.ledger.validate().context("Invalid [ledger] section")?;
        self.ledger.commitment_config()?;
        self.image_host.validate().context("Invalid [image_host] section")?;
        self.document_host
            .validate()
            .context("Invalid [document_host] section")?;
        self.http.validate().context("Invalid [http] section")?;

        if self.image_host.api_key.is_empty() {
            bail!("Image host API key missing: set image_host.api_key or {}", ENV_IMGBB_API_KEY);
        }
        if self.document_host.token.is_empty() {
            bail!("Document host token missing: set document_host.token or {}", ENV_GITHUB_TOKEN);
        }
        Ok(())
    }
}
