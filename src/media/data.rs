use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// `type` value marking a data message as a transcription event.
pub const TRANSCRIPTION_TYPE: &str = "transcription";

/// Structured message carried on the room data channel.
///
/// The agent side sends transcription events as JSON; other message kinds
/// share the same envelope and are ignored by this client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataMessage {
    #[serde(rename = "type")]
    pub kind: String,

    pub text: String,

    /// Absent means final: a sender that doesn't track partial results only
    /// ever sends finished text.
    #[serde(default = "default_final")]
    pub is_final: bool,
}

fn default_final() -> bool {
    true
}

/// A transcription event extracted from a data message.
#[derive(Debug, Clone)]
pub struct TranscriptionEvent {
    pub text: String,
    pub is_final: bool,
}

/// Decode a raw data-channel payload.
///
/// Returns `Ok(None)` for well-formed messages of another kind, and an error
/// for payloads that are not valid UTF-8 JSON in the expected envelope.
pub fn decode_transcription(payload: &[u8]) -> Result<Option<TranscriptionEvent>> {
    let message: DataMessage =
        serde_json::from_slice(payload).context("Failed to parse data message")?;

    if message.kind != TRANSCRIPTION_TYPE {
        return Ok(None);
    }

    Ok(Some(TranscriptionEvent {
        text: message.text,
        is_final: message.is_final,
    }))
}
