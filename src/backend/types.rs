use serde::{Deserialize, Serialize};

/// Credential request sent to the token endpoint.
#[derive(Debug, Serialize)]
pub struct CredentialRequest<'a> {
    pub room_name: &'a str,
    pub participant_name: &'a str,
}

/// Short-lived access credential for joining a media room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    /// Transport URL to connect to
    pub url: String,
    /// Access token authorizing the participant
    pub token: String,
}

/// Response from session creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: String,
}

/// One persisted utterance from a past session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub speaker: String,
    pub text: String,
    pub timestamp: String,
}
