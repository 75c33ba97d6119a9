use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Speaker label reserved for lifecycle notices (connect/disconnect).
pub const SYSTEM_SPEAKER: &str = "System";

/// One logical spoken contribution in the transcript.
///
/// A partial utterance may be revised in place while the speaker is still
/// talking; once `is_final` is set the entry is immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    /// Monotonically increasing identifier, unique within a transcript
    pub id: u64,

    /// Who said it: a remote participant identity, the local user, or
    /// [`SYSTEM_SPEAKER`]
    pub speaker: String,

    /// Current best-known content
    pub text: String,

    /// When this logical utterance was first created (not updated when a
    /// partial result is revised)
    pub timestamp: DateTime<Utc>,

    /// Whether the speech-recognition source may still revise the text
    pub is_final: bool,
}
