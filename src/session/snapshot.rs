use crate::transcript::Utterance;
use serde::{Deserialize, Serialize};

/// Where the session lifecycle currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionPhase {
    #[default]
    Idle,
    Connecting,
    Connected,
}

/// Read-only view of the session, the only surface presentation layers see.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: ConnectionPhase,

    /// Ordered transcript, oldest first
    pub transcript: Vec<Utterance>,

    /// Most recent failure, replaced per attempt and cleared when a new
    /// start begins
    pub last_error: Option<String>,

    /// Backend session id while one is active
    pub session_id: Option<String>,
}

impl SessionSnapshot {
    pub fn is_connected(&self) -> bool {
        self.phase == ConnectionPhase::Connected
    }

    pub fn is_connecting(&self) -> bool {
        self.phase == ConnectionPhase::Connecting
    }
}
