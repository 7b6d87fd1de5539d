//! Off-chain publishing: the token image and its metadata document

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AdapterError, LaunchError, LaunchResult};
use crate::hosts::{DocumentHost, ImageHost};
use crate::types::{ImageAsset, LaunchRequest};

pub const DEFAULT_TOKEN_DESCRIPTION: &str = "My custom token";
pub const DEFAULT_METADATA_FILE_NAME: &str = "metadata.json";

/// Off-chain metadata document the on-chain `uri` points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataDocument {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub image: String,
}

impl MetadataDocument {
    pub fn new(name: &str, symbol: &str, description: &str, image: &ImageAsset) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            description: description.to_string(),
            image: image.url.clone(),
        }
    }

    /// Pretty-printed JSON, two-space indented
    pub fn to_json(&self) -> Result<String, AdapterError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Uploads the token image
pub struct AssetPublisher {
    host: Arc<dyn ImageHost>,
}

impl AssetPublisher {
    pub fn new(host: Arc<dyn ImageHost>) -> Self {
        Self { host }
    }

    pub async fn publish(&self, image: &[u8]) -> LaunchResult<ImageAsset> {
        if image.is_empty() {
            return Err(LaunchError::UploadFailure(AdapterError::EmptyPayload));
        }
        let url = self
            .host
            .upload(image)
            .await
            .map_err(LaunchError::UploadFailure)?;

        info!(host = self.host.name(), url = %url, "Image uploaded");
        Ok(ImageAsset { url })
    }
}

/// Builds and publishes the metadata document
pub struct MetadataPublisher {
    host: Arc<dyn DocumentHost>,
    description: String,
    file_name: String,
}

impl MetadataPublisher {
    pub fn new(host: Arc<dyn DocumentHost>) -> Self {
        Self {
            host,
            description: DEFAULT_TOKEN_DESCRIPTION.to_string(),
            file_name: DEFAULT_METADATA_FILE_NAME.to_string(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn document(&self, request: &LaunchRequest, image: &ImageAsset) -> MetadataDocument {
        MetadataDocument::new(request.name(), request.symbol(), &self.description, image)
    }

    /// Publish the document and return the URL of its raw content
    pub async fn publish(&self, request: &LaunchRequest, image: &ImageAsset) -> LaunchResult<String> {
        let content = self
            .document(request, image)
            .to_json()
            .map_err(LaunchError::MetadataPublishFailure)?;

        let raw_url = self
            .host
            .publish(&self.file_name, &content)
            .await
            .map_err(LaunchError::MetadataPublishFailure)?;

        info!(host = self.host.name(), raw_url = %raw_url, "Metadata JSON published");
        Ok(raw_url)
    }
}
