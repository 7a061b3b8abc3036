use casefolio_config::DriveSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Best-effort Google Drive folder provisioning for new cases. Every
/// failure path returns `None`; case creation never depends on it.
#[derive(Clone)]
pub struct DriveService {
    client: reqwest::Client,
    settings: DriveSettings,
}

#[derive(Debug, Serialize)]
struct CreateFolderRequest<'a> {
    name: &'a str,
    #[serde(rename = "mimeType")]
    mime_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateFolderResponse {
    id: String,
}

impl DriveService {
    pub fn new(settings: DriveSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client, settings }
    }

    pub fn is_configured(&self) -> bool {
        self.settings.access_token.is_some()
    }

    pub async fn provision_case_folder(&self, folder_name: &str) -> Option<String> {
        let access_token = self.settings.access_token.as_deref()?;

        let request = CreateFolderRequest {
            name: folder_name,
            mime_type: "application/vnd.google-apps.folder",
        };

        let result = self
            .client
            .post(format!("{}/files", self.settings.api_url))
            .bearer_auth(access_token)
            .json(&request)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                match response.json::<CreateFolderResponse>().await {
                    Ok(folder) => Some(folder.id),
                    Err(error) => {
                        warn!(%error, "Drive folder response could not be parsed");
                        None
                    }
                }
            }
            Ok(response) => {
                warn!(status = %response.status(), folder_name, "Drive folder creation rejected");
                None
            }
            Err(error) => {
                warn!(%error, folder_name, "Drive folder creation failed");
                None
            }
        }
    }
}
