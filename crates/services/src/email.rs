use async_trait::async_trait;
use casefolio_config::EmailSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Email provider error: {0}")]
    Provider(String),
    #[error("Email request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// Delivery seam for the reminder dispatcher. The concrete provider is an
/// HTTP API; tests substitute their own implementation.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// One attempt; returns the provider-assigned message id.
    async fn send(&self, message: &EmailMessage) -> Result<String, MailError>;
}

pub struct HttpMailer {
    client: reqwest::Client,
    settings: EmailSettings,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

impl HttpMailer {
    pub fn new(settings: EmailSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client, settings }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<String, MailError> {
        let Some(api_key) = self.settings.api_key.as_deref() else {
            // Unconfigured environments (dev, CI) log instead of sending.
            let synthetic_id = format!("noop-{}", uuid::Uuid::new_v4());
            info!(to = ?message.to, subject = %message.subject, "Email provider not configured, skipping send");
            return Ok(synthetic_id);
        };

        let request = SendRequest {
            from: &self.settings.from_address,
            to: &message.to,
            subject: &message.subject,
            text: &message.body,
        };

        let response = self
            .client
            .post(&self.settings.api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Provider(format!("{status}: {body}")));
        }

        let parsed: SendResponse = response.json().await?;
        Ok(parsed.id)
    }
}
