use super::api::BackendApi;
use super::types::{Credential, CredentialRequest, HistoryEntry, SessionCreated};
use anyhow::{Context, Result};
use tracing::info;

/// REST client for the backend service.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// `base_url` is the service root, e.g. `http://localhost:8000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait::async_trait]
impl BackendApi for HttpBackend {
    async fn generate_credential(
        &self,
        room_name: &str,
        participant_name: &str,
    ) -> Result<Credential> {
        let url = format!("{}/api/auth/token/generate", self.base_url);
        info!("Requesting credential for {} in {}", participant_name, room_name);

        let response = self
            .client
            .post(&url)
            .json(&CredentialRequest {
                room_name,
                participant_name,
            })
            .send()
            .await
            .context("Failed to reach credential endpoint")?
            .error_for_status()
            .context("Credential request rejected")?;

        response
            .json()
            .await
            .context("Failed to parse credential response")
    }

    async fn create_session(&self, user_id: Option<&str>) -> Result<SessionCreated> {
        let url = format!("{}/api/voice/session/create", self.base_url);

        let mut request = self.client.post(&url);
        if let Some(user_id) = user_id {
            request = request.query(&[("user_id", user_id)]);
        }

        let response = request
            .send()
            .await
            .context("Failed to reach session endpoint")?
            .error_for_status()
            .context("Session creation rejected")?;

        response
            .json()
            .await
            .context("Failed to parse session response")
    }

    async fn end_session(&self, session_id: &str) -> Result<()> {
        let url = format!("{}/api/voice/session/{}/end", self.base_url, session_id);

        self.client
            .post(&url)
            .send()
            .await
            .context("Failed to reach session endpoint")?
            .error_for_status()
            .context("End-session request rejected")?;

        Ok(())
    }

    async fn session_history(&self, session_id: &str) -> Result<Vec<HistoryEntry>> {
        let url = format!("{}/api/voice/session/{}/history", self.base_url, session_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to reach session endpoint")?
            .error_for_status()
            .context("History request rejected")?;

        response
            .json()
            .await
            .context("Failed to parse session history")
    }
}
