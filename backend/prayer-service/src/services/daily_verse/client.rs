use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::ContentFetchError;

/// Verse text as returned by the lookup service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersePayload {
    pub text: String,
    pub reference: String,
}

/// Resolves a verse reference to its text.
#[async_trait]
pub trait VerseSource: Send + Sync {
    async fn fetch(&self, reference: &str) -> Result<VersePayload, ContentFetchError>;
}

/// HTTP client for a bible-api.com style service: `GET {base}/{reference}`
/// answering `{"text": ..., "reference": ...}`.
#[derive(Debug, Clone)]
pub struct BibleApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl BibleApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ContentFetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ContentFetchError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn url_for(&self, reference: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(reference)
        )
    }
}

#[async_trait]
impl VerseSource for BibleApiClient {
    async fn fetch(&self, reference: &str) -> Result<VersePayload, ContentFetchError> {
        let url = self.url_for(reference);
        debug!(%url, "fetching verse");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ContentFetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentFetchError::Status(status.as_u16()));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ContentFetchError::Malformed(e.to_string()))?;

        parse_payload(&body)
    }
}

fn parse_payload(body: &serde_json::Value) -> Result<VersePayload, ContentFetchError> {
    let field = |name: &'static str| {
        body.get(name)
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or(ContentFetchError::MissingField(name))
    };

    Ok(VersePayload {
        text: field("text")?,
        reference: field("reference")?,
    })
}
