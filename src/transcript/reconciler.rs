use super::utterance::{Utterance, SYSTEM_SPEAKER};
use chrono::Utc;

/// Merges a stream of (speaker, text, finality) transcription events into an
/// ordered utterance log.
///
/// The log is append-only with one exception: while the last entry is still
/// partial, further events from the same speaker revise it in place. Entries
/// other than the last are never touched.
#[derive(Debug, Default)]
pub struct TranscriptReconciler {
    entries: Vec<Utterance>,
    next_id: u64,
}

impl TranscriptReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one transcription event into the log.
    ///
    /// If the last entry is a partial from the same speaker, its text and
    /// finality are overwritten in place and its id and timestamp are kept,
    /// so a live utterance converges to its final text under a stable
    /// identity. Every other event appends.
    pub fn reconcile(&mut self, speaker: &str, text: &str, is_final: bool) {
        if let Some(last) = self.entries.last_mut() {
            if !last.is_final && last.speaker == speaker {
                last.text = text.to_string();
                last.is_final = is_final;
                return;
            }
            // A different speaker takes over while the last utterance is
            // still partial: freeze it as-is so only the last entry in the
            // log can ever be partial.
            if !last.is_final {
                last.is_final = true;
            }
        }

        self.next_id += 1;
        self.entries.push(Utterance {
            id: self.next_id,
            speaker: speaker.to_string(),
            text: text.to_string(),
            timestamp: Utc::now(),
            is_final,
        });
    }

    /// Append a lifecycle notice under the reserved "System" speaker.
    pub fn system(&mut self, text: &str) {
        self.reconcile(SYSTEM_SPEAKER, text, true);
    }

    /// Empty the log. The id counter keeps counting so ids stay unique
    /// across clears.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The ordered log, oldest first.
    pub fn entries(&self) -> &[Utterance] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
