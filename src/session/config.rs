use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a voice session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Media room every session joins (one shared room per deployment)
    pub room_name: String,

    /// Prefix for generated participant names
    pub participant_prefix: String,

    /// Let the transport adapt stream quality to network conditions
    pub adaptive_stream: bool,

    /// Only cast tracks somebody is subscribed to
    pub dynacast: bool,

    /// Bound on each backend request (credential, session create/end)
    pub request_timeout: Duration,

    /// Bound on joining the media room
    pub connect_timeout: Duration,
}

impl SessionConfig {
    /// Fresh participant name for one connection attempt.
    ///
    /// The random fragment only needs to avoid collisions between
    /// concurrent participants; it carries no secret.
    pub fn participant_name(&self) -> String {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        format!("{}-{}", self.participant_prefix, &suffix[..9])
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            room_name: "voice-assistant".to_string(),
            participant_prefix: "user".to_string(),
            adaptive_stream: true,
            dynacast: true,
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(15),
        }
    }
}
