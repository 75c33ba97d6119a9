//! Real-time media transport interface
//!
//! The controller talks to the media layer only through the traits defined
//! here:
//! - `MediaTransport` creates rooms; `MediaRoom` is the live connection
//!   handle (connect, publish microphone, disconnect)
//! - Room events (tracks, data messages, disconnection) arrive over a
//!   channel handed out at room creation, so nothing emitted before the
//!   consumer task is running gets lost
//! - `AudioSink` is the process-wide playback endpoint remote audio tracks
//!   attach to
//!
//! `LoopbackTransport` is the in-process implementation used by the binary,
//! the demos, and the integration tests. Network transports live outside
//! this crate.

mod data;
mod loopback;
mod room;
mod sink;

pub use data::{decode_transcription, DataMessage, TranscriptionEvent, TRANSCRIPTION_TYPE};
pub use loopback::{LoopbackHandle, LoopbackTransport};
pub use room::{MediaRoom, MediaTransport, RemoteTrack, RoomEvent, RoomOptions, TrackKind};
pub use sink::{AudioSink, PlaybackSink};
