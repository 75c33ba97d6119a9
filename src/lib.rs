pub mod backend;
pub mod config;
pub mod media;
pub mod session;
pub mod transcript;

pub use backend::{BackendApi, HttpBackend, MemoryBackend};
pub use config::Config;
pub use media::{
    AudioSink, LoopbackHandle, LoopbackTransport, MediaRoom, MediaTransport, PlaybackSink,
    RemoteTrack, RoomEvent, RoomOptions, TrackKind,
};
pub use session::{ConnectionPhase, SessionConfig, SessionController, SessionSnapshot};
pub use transcript::{TranscriptReconciler, Utterance, SYSTEM_SPEAKER};
