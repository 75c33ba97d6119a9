use super::api::BackendApi;
use super::types::{Credential, HistoryEntry, SessionCreated};
use anyhow::{bail, Result};
use std::sync::Mutex;
use tracing::info;

/// In-process backend for development and tests.
///
/// Mints uuid session ids, issues placeholder credentials, and records
/// which sessions were created and ended so callers can assert on the
/// lifecycle.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    created: Mutex<Vec<String>>,
    ended: Mutex<Vec<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session ids handed out so far, in creation order.
    pub fn created_sessions(&self) -> Vec<String> {
        self.created.lock().expect("backend state poisoned").clone()
    }

    /// Session ids that have been ended, in call order.
    pub fn ended_sessions(&self) -> Vec<String> {
        self.ended.lock().expect("backend state poisoned").clone()
    }
}

#[async_trait::async_trait]
impl BackendApi for MemoryBackend {
    async fn generate_credential(
        &self,
        room_name: &str,
        participant_name: &str,
    ) -> Result<Credential> {
        info!(
            "Issuing local credential for {} in {}",
            participant_name, room_name
        );
        Ok(Credential {
            url: "loopback://local".to_string(),
            token: uuid::Uuid::new_v4().to_string(),
        })
    }

    async fn create_session(&self, _user_id: Option<&str>) -> Result<SessionCreated> {
        let session_id = uuid::Uuid::new_v4().to_string();
        self.created
            .lock()
            .expect("backend state poisoned")
            .push(session_id.clone());
        Ok(SessionCreated { session_id })
    }

    async fn end_session(&self, session_id: &str) -> Result<()> {
        let known = self
            .created
            .lock()
            .expect("backend state poisoned")
            .iter()
            .any(|id| id == session_id);
        if !known {
            bail!("Unknown session {}", session_id);
        }

        self.ended
            .lock()
            .expect("backend state poisoned")
            .push(session_id.to_string());
        Ok(())
    }

    async fn session_history(&self, session_id: &str) -> Result<Vec<HistoryEntry>> {
        let ended = self
            .ended
            .lock()
            .expect("backend state poisoned")
            .iter()
            .any(|id| id == session_id);
        if !ended {
            bail!("Session {} is not finished", session_id);
        }

        // No persistence behind the in-memory backend; finished sessions
        // report an empty history.
        Ok(Vec::new())
    }
}
