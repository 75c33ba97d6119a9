// Integration tests for the session lifecycle state machine.
//
// The loopback transport plays the media room and MemoryBackend (or a
// failing wrapper around it) plays the backend service, so every lifecycle
// path runs in-process.

use anyhow::{bail, Result};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;
use voicelink::backend::types::{Credential, HistoryEntry, SessionCreated};
use voicelink::{
    AudioSink, BackendApi, LoopbackHandle, LoopbackTransport, MemoryBackend, PlaybackSink,
    RemoteTrack, RoomEvent, SessionConfig, SessionController, TrackKind, SYSTEM_SPEAKER,
};

/// Backend wrapper that fails selected operations.
struct FailingBackend {
    inner: MemoryBackend,
    fail_credential: bool,
    fail_create: bool,
    fail_end: bool,
}

impl FailingBackend {
    fn new() -> Self {
        Self {
            inner: MemoryBackend::new(),
            fail_credential: false,
            fail_create: false,
            fail_end: false,
        }
    }
}

#[async_trait::async_trait]
impl BackendApi for FailingBackend {
    async fn generate_credential(
        &self,
        room_name: &str,
        participant_name: &str,
    ) -> Result<Credential> {
        if self.fail_credential {
            bail!("Token service unavailable");
        }
        self.inner
            .generate_credential(room_name, participant_name)
            .await
    }

    async fn create_session(&self, user_id: Option<&str>) -> Result<SessionCreated> {
        if self.fail_create {
            bail!("Session store unavailable");
        }
        self.inner.create_session(user_id).await
    }

    async fn end_session(&self, session_id: &str) -> Result<()> {
        if self.fail_end {
            bail!("Session store unavailable");
        }
        self.inner.end_session(session_id).await
    }

    async fn session_history(&self, session_id: &str) -> Result<Vec<HistoryEntry>> {
        self.inner.session_history(session_id).await
    }
}

/// Sink that exposes what is attached, for assertions.
#[derive(Clone, Default)]
struct RecordingSink {
    attached: Arc<Mutex<Vec<String>>>,
}

impl AudioSink for RecordingSink {
    fn attach(&mut self, track: &RemoteTrack) {
        self.attached.lock().unwrap().push(track.sid.clone());
    }

    fn detach(&mut self, track_sid: &str) {
        self.attached.lock().unwrap().retain(|sid| sid != track_sid);
    }
}

fn quick_config() -> SessionConfig {
    SessionConfig {
        request_timeout: Duration::from_secs(2),
        connect_timeout: Duration::from_secs(2),
        ..SessionConfig::default()
    }
}

fn build(backend: Arc<dyn BackendApi>) -> (SessionController, LoopbackHandle) {
    let transport = Arc::new(LoopbackTransport::new());
    let handle = transport.handle();
    let controller = SessionController::new(
        quick_config(),
        backend,
        transport,
        Box::new(PlaybackSink::new()),
    );
    (controller, handle)
}

/// Let the event task catch up with everything sent so far.
async fn settle() {
    sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn test_start_connects_and_publishes_microphone() {
    let backend = Arc::new(MemoryBackend::new());
    let (controller, handle) = build(backend.clone());

    controller.start().await.unwrap();

    let snapshot = controller.snapshot().await;
    assert!(snapshot.is_connected());
    assert!(!snapshot.is_connecting());
    assert!(snapshot.last_error.is_none());
    assert!(snapshot.session_id.is_some());

    assert!(handle.is_connected());
    assert!(handle.microphone_enabled());
    assert_eq!(backend.created_sessions().len(), 1);

    // Exactly one System notice announcing readiness.
    assert_eq!(snapshot.transcript.len(), 1);
    assert_eq!(snapshot.transcript[0].speaker, SYSTEM_SPEAKER);
    assert!(snapshot.transcript[0].is_final);
}

#[tokio::test]
async fn test_credential_failure_never_creates_session() {
    let backend = Arc::new({
        let mut failing = FailingBackend::new();
        failing.fail_credential = true;
        failing
    });
    let (controller, handle) = build(backend.clone());

    assert!(controller.start().await.is_err());

    let snapshot = controller.snapshot().await;
    assert!(!snapshot.is_connected());
    assert!(!snapshot.is_connecting());
    assert!(snapshot.session_id.is_none());
    assert!(snapshot
        .last_error
        .as_deref()
        .unwrap()
        .contains("credential"));

    // The session-creation step was never reached.
    assert!(backend.inner.created_sessions().is_empty());
    assert!(!handle.is_connected());
}

#[tokio::test]
async fn test_session_creation_failure_leaves_idle() {
    let backend = Arc::new({
        let mut failing = FailingBackend::new();
        failing.fail_create = true;
        failing
    });
    let (controller, handle) = build(backend);

    assert!(controller.start().await.is_err());

    let snapshot = controller.snapshot().await;
    assert!(!snapshot.is_connected());
    assert!(snapshot.session_id.is_none());
    assert!(snapshot.last_error.is_some());
    assert!(!handle.is_connected());
}

#[tokio::test]
async fn test_connect_failure_is_retryable() {
    let backend = Arc::new(MemoryBackend::new());
    let (controller, handle) = build(backend.clone());

    handle.fail_connect();
    assert!(controller.start().await.is_err());

    let snapshot = controller.snapshot().await;
    assert!(!snapshot.is_connected());
    assert!(!handle.is_connected());
    assert!(snapshot.last_error.as_deref().unwrap().contains("media room"));

    // The failed attempt released everything; a retry connects cleanly.
    controller.start().await.unwrap();
    let snapshot = controller.snapshot().await;
    assert!(snapshot.is_connected());
    assert!(snapshot.last_error.is_none(), "new attempt clears the error");
    assert!(handle.is_connected());
}

#[tokio::test]
async fn test_microphone_failure_releases_connected_room() {
    let backend = Arc::new(MemoryBackend::new());
    let (controller, handle) = build(backend);

    handle.fail_microphone();
    assert!(controller.start().await.is_err());

    let snapshot = controller.snapshot().await;
    assert!(!snapshot.is_connected());
    assert!(snapshot
        .last_error
        .as_deref()
        .unwrap()
        .contains("microphone"));

    // The room had already connected; the abort must have disconnected it.
    assert!(!handle.is_connected());
}

#[tokio::test]
async fn test_stop_tears_everything_down() {
    let backend = Arc::new(MemoryBackend::new());
    let (controller, handle) = build(backend.clone());

    controller.start().await.unwrap();
    let session_id = controller.snapshot().await.session_id.unwrap();

    controller.stop().await.unwrap();

    let snapshot = controller.snapshot().await;
    assert!(!snapshot.is_connected());
    assert!(snapshot.session_id.is_none());
    assert!(!handle.is_connected());
    assert!(!handle.microphone_enabled());
    assert_eq!(backend.ended_sessions(), vec![session_id]);

    let last = snapshot.transcript.last().unwrap();
    assert_eq!(last.speaker, SYSTEM_SPEAKER);
    assert_eq!(last.text, "Session ended.");
}

#[tokio::test]
async fn test_stop_when_idle_is_a_silent_noop() {
    let backend = Arc::new(MemoryBackend::new());
    let (controller, _handle) = build(backend.clone());

    controller.stop().await.unwrap();

    let snapshot = controller.snapshot().await;
    assert!(!snapshot.is_connected());
    assert!(snapshot.last_error.is_none());
    assert!(snapshot.transcript.is_empty(), "no notice for a no-op stop");
    assert!(backend.ended_sessions().is_empty());
}

#[tokio::test]
async fn test_teardown_failure_still_settles_to_idle() {
    let backend = Arc::new({
        let mut failing = FailingBackend::new();
        failing.fail_end = true;
        failing
    });
    let (controller, handle) = build(backend);

    controller.start().await.unwrap();
    assert!(controller.stop().await.is_err());

    let snapshot = controller.snapshot().await;
    assert!(!snapshot.is_connected());
    assert!(snapshot.session_id.is_none());
    assert!(snapshot.last_error.is_some());
    assert!(!handle.is_connected());

    // The notice still lands even though teardown reported an error.
    let last = snapshot.transcript.last().unwrap();
    assert_eq!(last.speaker, SYSTEM_SPEAKER);
}

#[tokio::test]
async fn test_start_while_connected_coalesces() {
    let backend = Arc::new(MemoryBackend::new());
    let (controller, _handle) = build(backend.clone());

    controller.start().await.unwrap();
    controller.start().await.unwrap();

    let snapshot = controller.snapshot().await;
    assert!(snapshot.is_connected());
    assert_eq!(backend.created_sessions().len(), 1, "no second session");
    assert_eq!(snapshot.transcript.len(), 1, "transcript untouched");
}

#[tokio::test]
async fn test_transcription_events_reach_the_transcript() {
    let backend = Arc::new(MemoryBackend::new());
    let (controller, handle) = build(backend);

    controller.start().await.unwrap();

    handle
        .send_transcription(Some("agent-1"), "Hi", false)
        .await
        .unwrap();
    settle().await;

    let snapshot = controller.snapshot().await;
    let entry = snapshot.transcript.last().unwrap();
    assert_eq!(entry.speaker, "agent-1");
    assert_eq!(entry.text, "Hi");
    assert!(!entry.is_final);

    handle
        .send_transcription(Some("agent-1"), "Hi there", true)
        .await
        .unwrap();
    settle().await;

    let snapshot = controller.snapshot().await;
    // System notice plus the one merged utterance.
    assert_eq!(snapshot.transcript.len(), 2);
    let entry = snapshot.transcript.last().unwrap();
    assert_eq!(entry.text, "Hi there");
    assert!(entry.is_final);
}

#[tokio::test]
async fn test_anonymous_sender_becomes_ai() {
    let backend = Arc::new(MemoryBackend::new());
    let (controller, handle) = build(backend);

    controller.start().await.unwrap();
    handle
        .send_transcription(None, "Hello", true)
        .await
        .unwrap();
    settle().await;

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.transcript.last().unwrap().speaker, "AI");
}

#[tokio::test]
async fn test_malformed_payloads_are_swallowed() {
    let backend = Arc::new(MemoryBackend::new());
    let (controller, handle) = build(backend);

    controller.start().await.unwrap();
    handle
        .send_transcription(Some("agent-1"), "Hi", false)
        .await
        .unwrap();
    settle().await;
    let before = controller.snapshot().await;

    handle
        .send_data(Some("agent-1"), b"not json at all".to_vec())
        .await
        .unwrap();
    // Well-formed but not a transcription: also ignored.
    handle
        .send_data(Some("agent-1"), br#"{"type":"ping","text":"x"}"#.to_vec())
        .await
        .unwrap();
    settle().await;

    let after = controller.snapshot().await;
    assert_eq!(after.transcript, before.transcript);
    assert!(after.last_error.is_none(), "never surfaced as session error");
    assert!(after.is_connected());
}

#[tokio::test]
async fn test_remote_disconnect_forces_idle() {
    let backend = Arc::new(MemoryBackend::new());
    let (controller, handle) = build(backend.clone());

    controller.start().await.unwrap();
    let session_id = controller.snapshot().await.session_id.unwrap();

    handle.drop_connection("network lost").await.unwrap();
    settle().await;

    let snapshot = controller.snapshot().await;
    assert!(!snapshot.is_connected());
    assert!(!snapshot.is_connecting());

    // The backend session survived the hangup; stop() still ends it.
    controller.stop().await.unwrap();
    assert_eq!(backend.ended_sessions(), vec![session_id]);
}

#[tokio::test]
async fn test_clear_transcript_works_while_connected() {
    let backend = Arc::new(MemoryBackend::new());
    let (controller, handle) = build(backend);

    controller.start().await.unwrap();
    handle
        .send_transcription(Some("agent-1"), "Hello", true)
        .await
        .unwrap();
    settle().await;
    assert_eq!(controller.snapshot().await.transcript.len(), 2);

    controller.clear_transcript().await;

    let snapshot = controller.snapshot().await;
    assert!(snapshot.transcript.is_empty());
    assert!(snapshot.is_connected(), "clearing never touches the phase");
}

#[tokio::test]
async fn test_audio_tracks_attach_and_detach() {
    let backend = Arc::new(MemoryBackend::new());
    let transport = Arc::new(LoopbackTransport::new());
    let handle = transport.handle();
    let sink = RecordingSink::default();
    let attached = sink.attached.clone();

    let controller =
        SessionController::new(quick_config(), backend, transport, Box::new(sink));
    controller.start().await.unwrap();

    let audio = RemoteTrack {
        sid: "TR_audio".to_string(),
        kind: TrackKind::Audio,
        participant: "agent-1".to_string(),
    };
    let video = RemoteTrack {
        sid: "TR_video".to_string(),
        kind: TrackKind::Video,
        participant: "agent-1".to_string(),
    };

    handle
        .send_event(RoomEvent::TrackSubscribed {
            track: audio.clone(),
        })
        .await
        .unwrap();
    handle
        .send_event(RoomEvent::TrackSubscribed {
            track: video.clone(),
        })
        .await
        .unwrap();
    settle().await;

    assert_eq!(
        *attached.lock().unwrap(),
        vec!["TR_audio".to_string()],
        "only audio tracks are routed to the sink"
    );

    handle
        .send_event(RoomEvent::TrackUnsubscribed { track: audio })
        .await
        .unwrap();
    settle().await;

    assert!(attached.lock().unwrap().is_empty());
}
