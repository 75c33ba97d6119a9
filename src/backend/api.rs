use super::types::{Credential, HistoryEntry, SessionCreated};
use anyhow::Result;

/// Request/response surface of the backend service.
///
/// Covers both the credential endpoint and session persistence; the backend
/// exposes them as one API and the controller consumes them together.
#[async_trait::async_trait]
pub trait BackendApi: Send + Sync {
    /// Issue an access credential scoped to a room and participant.
    async fn generate_credential(
        &self,
        room_name: &str,
        participant_name: &str,
    ) -> Result<Credential>;

    /// Create a new voice session, optionally tied to a user.
    async fn create_session(&self, user_id: Option<&str>) -> Result<SessionCreated>;

    /// End a session previously created with [`create_session`].
    ///
    /// [`create_session`]: BackendApi::create_session
    async fn end_session(&self, session_id: &str) -> Result<()>;

    /// Persisted utterances of a past session, oldest first. Not used by the
    /// session lifecycle itself.
    async fn session_history(&self, session_id: &str) -> Result<Vec<HistoryEntry>>;
}
