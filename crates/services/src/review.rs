use base64::Engine;
use casefolio_config::ReviewSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Document review is not configured")]
    Unavailable,
    #[error("Review service error: {0}")]
    Upstream(String),
    #[error("Review request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Client for the AI document-review webhook. Unlike Drive provisioning
/// this is an essential action: errors surface to the caller.
#[derive(Clone)]
pub struct ReviewService {
    client: reqwest::Client,
    settings: ReviewSettings,
}

#[derive(Debug, Serialize)]
struct ReviewRequest<'a> {
    content_type: &'a str,
    /// Base64-encoded payload.
    data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub summary: String,
    pub document_type: Option<String>,
    #[serde(default)]
    pub confidence: f64,
}

impl ReviewService {
    pub fn new(settings: ReviewSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client, settings }
    }

    pub async fn review(
        &self,
        file_bytes: &[u8],
        content_type: &str,
    ) -> Result<ReviewOutcome, ReviewError> {
        let webhook_url = self
            .settings
            .webhook_url
            .as_deref()
            .ok_or(ReviewError::Unavailable)?;

        let request = ReviewRequest {
            content_type,
            data: base64::engine::general_purpose::STANDARD.encode(file_bytes),
        };

        let mut builder = self.client.post(webhook_url).json(&request);
        if let Some(api_key) = self.settings.api_key.as_deref() {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ReviewError::Upstream(format!("{status}: {body}")));
        }

        Ok(response.json::<ReviewOutcome>().await?)
    }
}
