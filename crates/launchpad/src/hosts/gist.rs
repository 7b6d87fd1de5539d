use std::fmt;

use async_trait::async_trait;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::json;

use super::{ensure_success, DocumentHost};
use crate::error::AdapterError;

pub const GIST_ENDPOINT: &str = "https://api.github.com/gists";

/// GitHub Gist document host
pub struct GistHost {
    client: reqwest::Client,
    endpoint: String,
    token: String,
    description: String,
    public: bool,
}

#[derive(Debug, Deserialize)]
struct GistResponse {
    raw_url: Option<String>,
    #[serde(default, deserialize_with = "files_in_response_order")]
    files: Vec<(String, GistFile)>,
}

#[derive(Debug, Deserialize)]
struct GistFile {
    raw_url: Option<String>,
}

/// Read the `files` object keeping its entries in the order they were sent
fn files_in_response_order<'de, D>(deserializer: D) -> Result<Vec<(String, GistFile)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct FilesVisitor;

    impl<'de> Visitor<'de> for FilesVisitor {
        type Value = Vec<(String, GistFile)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of gist files")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut files = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, GistFile>()? {
                files.push(entry);
            }
            Ok(files)
        }
    }

    deserializer.deserialize_map(FilesVisitor)
}

impl GistHost {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        token: impl Into<String>,
        description: impl Into<String>,
        public: bool,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
            description: description.into(),
            public,
        }
    }
}

/// Raw content URL of a created gist: the top-level `raw_url` when present,
/// otherwise the `raw_url` of the first file entry
pub fn extract_raw_url(body: &str) -> Result<String, AdapterError> {
    let response: GistResponse = serde_json::from_str(body)?;
    if let Some(url) = response.raw_url.filter(|url| !url.is_empty()) {
        return Ok(url);
    }

    let (name, file) = response
        .files
        .into_iter()
        .next()
        .ok_or_else(|| AdapterError::MissingUrl("gist response has no files".to_string()))?;

    file.raw_url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| AdapterError::MissingUrl(format!("gist file {} has no raw_url", name)))
}

#[async_trait]
impl DocumentHost for GistHost {
    fn name(&self) -> &'static str {
        "github-gist"
    }

    async fn publish(&self, file_name: &str, content: &str) -> Result<String, AdapterError> {
        if content.is_empty() {
            return Err(AdapterError::EmptyPayload);
        }

        let body = json!({
            "description": self.description,
            "public": self.public,
            "files": {
                file_name: { "content": content }
            }
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, format!("token {}", self.token))
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .json(&body)
            .send()
            .await?;

        let body = ensure_success(response).await?.text().await?;
        extract_raw_url(&body)
    }
}
