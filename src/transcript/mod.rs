//! Live transcript reconciliation
//!
//! This module owns the ordered utterance log and the merge rule for
//! incoming transcription events:
//! - A partial utterance is revised in place while the same speaker keeps
//!   talking, then frozen once a final result arrives
//! - Finalized utterances are never mutated again
//! - Lifecycle notices are appended under the reserved "System" speaker

mod reconciler;
mod utterance;

pub use reconciler::TranscriptReconciler;
pub use utterance::{Utterance, SYSTEM_SPEAKER};
