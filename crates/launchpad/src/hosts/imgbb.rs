use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::{ensure_success, ImageHost};
use crate::error::AdapterError;

pub const IMGBB_UPLOAD_ENDPOINT: &str = "https://api.imgbb.com/1/upload";

/// ImgBB image host
pub struct ImgBbHost {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    data: Option<UploadData>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    url: Option<String>,
}

impl ImgBbHost {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

/// Pull `data.url` out of an upload response body
pub fn extract_image_url(body: &str) -> Result<String, AdapterError> {
    let response: UploadResponse = serde_json::from_str(body)?;
    response
        .data
        .and_then(|data| data.url)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| AdapterError::MissingUrl("upload response has no data.url".to_string()))
}

#[async_trait]
impl ImageHost for ImgBbHost {
    fn name(&self) -> &'static str {
        "imgbb"
    }

    async fn upload(&self, image: &[u8]) -> Result<String, AdapterError> {
        if image.is_empty() {
            return Err(AdapterError::EmptyPayload);
        }

        let form = Form::new().part("image", Part::bytes(image.to_vec()).file_name("image"));
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .multipart(form)
            .send()
            .await?;

        let body = ensure_success(response).await?.text().await?;
        extract_image_url(&body)
    }
}
