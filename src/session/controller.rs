use super::config::SessionConfig;
use super::snapshot::{ConnectionPhase, SessionSnapshot};
use crate::backend::BackendApi;
use crate::media::{
    decode_transcription, AudioSink, MediaRoom, MediaTransport, RoomEvent, RoomOptions, TrackKind,
};
use crate::transcript::TranscriptReconciler;
use anyhow::{Context, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

const READY_NOTICE: &str = "Connected! You can start speaking now.";
const ENDED_NOTICE: &str = "Session ended.";

/// Speaker used for data messages whose sender identity is unknown.
const DEFAULT_REMOTE_SPEAKER: &str = "AI";

/// How long `stop()` waits for the event task to drain before aborting it.
const EVENT_TASK_GRACE: Duration = Duration::from_secs(2);

struct SessionState {
    phase: ConnectionPhase,
    session_id: Option<String>,
    last_error: Option<String>,
    room: Option<Box<dyn MediaRoom>>,
    transcript: TranscriptReconciler,
    event_task: Option<JoinHandle<()>>,
}

/// Drives the voice session lifecycle: credential acquisition, backend
/// session creation, media room connection, microphone publication, and the
/// teardown of all of it.
///
/// The controller exclusively owns the room handle and the audio sink.
/// `start` and `stop` are serialized end to end by an operation lock, so a
/// second caller queues behind an in-flight attempt instead of interleaving
/// with it; reads (`snapshot`) only touch the state lock and stay responsive
/// mid-connect.
pub struct SessionController {
    config: SessionConfig,
    backend: Arc<dyn BackendApi>,
    transport: Arc<dyn MediaTransport>,
    sink: Arc<Mutex<Box<dyn AudioSink>>>,
    state: Arc<Mutex<SessionState>>,
    ops: Mutex<()>,
}

impl SessionController {
    pub fn new(
        config: SessionConfig,
        backend: Arc<dyn BackendApi>,
        transport: Arc<dyn MediaTransport>,
        sink: Box<dyn AudioSink>,
    ) -> Self {
        Self {
            config,
            backend,
            transport,
            sink: Arc::new(Mutex::new(sink)),
            state: Arc::new(Mutex::new(SessionState {
                phase: ConnectionPhase::Idle,
                session_id: None,
                last_error: None,
                room: None,
                transcript: TranscriptReconciler::new(),
                event_task: None,
            })),
            ops: Mutex::new(()),
        }
    }

    /// Start a voice session: credential, backend session, media room,
    /// microphone, in that order, each step bounded and fail-fast.
    ///
    /// Calling start while a session is connecting or connected is a no-op.
    /// On failure the phase settles back to `Idle`, a partially established
    /// room is released, and the error is recorded in the snapshot's
    /// `last_error`; retrying is always safe.
    pub async fn start(&self) -> Result<()> {
        let _guard = self.ops.lock().await;

        {
            let mut state = self.state.lock().await;
            if state.phase != ConnectionPhase::Idle {
                warn!("Session already {:?}, ignoring start", state.phase);
                return Ok(());
            }
            state.phase = ConnectionPhase::Connecting;
            state.last_error = None;
            state.transcript.clear();
        }

        match self.connect().await {
            Ok(()) => {
                let mut state = self.state.lock().await;
                state.phase = ConnectionPhase::Connected;
                state.transcript.system(READY_NOTICE);
                info!("Session started");
                Ok(())
            }
            Err(err) => {
                error!("Failed to start session: {:#}", err);
                let mut state = self.state.lock().await;
                state.phase = ConnectionPhase::Idle;
                state.last_error = Some(format!("{err:#}"));
                Err(err)
            }
        }
    }

    async fn connect(&self) -> Result<()> {
        let participant = self.config.participant_name();

        info!(
            "Requesting access credential for {} in {}",
            participant, self.config.room_name
        );
        let credential = bounded(
            self.config.request_timeout,
            self.backend
                .generate_credential(&self.config.room_name, &participant),
        )
        .await
        .context("Failed to generate access credential")?;

        let session = bounded(self.config.request_timeout, self.backend.create_session(None))
            .await
            .context("Failed to create session")?;
        info!("Backend session {} created", session.session_id);
        {
            let mut state = self.state.lock().await;
            state.session_id = Some(session.session_id);
        }

        // The event channel exists from room creation, so events fired while
        // we are still connecting are buffered for the task spawned below.
        let options = RoomOptions {
            adaptive_stream: self.config.adaptive_stream,
            dynacast: self.config.dynacast,
        };
        let (mut room, events) = self
            .transport
            .create_room(options)
            .await
            .context("Failed to create media room")?;

        info!("Connecting to media room via {}", self.transport.name());
        bounded(
            self.config.connect_timeout,
            room.connect(&credential.url, &credential.token),
        )
        .await
        .context("Failed to connect to media room")?;

        info!("Enabling microphone");
        if let Err(err) = room.set_microphone_enabled(true).await {
            // The room is live at this point; release it so a failed start
            // never leaks a connected handle.
            if let Err(disconnect_err) = room.disconnect().await {
                warn!(
                    "Failed to release media room after microphone error: {:#}",
                    disconnect_err
                );
            }
            return Err(err.context("Failed to enable microphone"));
        }

        let task = tokio::spawn(run_event_task(
            events,
            Arc::clone(&self.state),
            Arc::clone(&self.sink),
        ));

        let mut state = self.state.lock().await;
        state.room = Some(room);
        state.event_task = Some(task);
        Ok(())
    }

    /// Tear the session down: disconnect the media room, end the backend
    /// session, settle to `Idle`.
    ///
    /// Every step runs even if an earlier one fails, so nothing is left
    /// stranded; the first teardown error is reported (and recorded in
    /// `last_error`) but never blocks the phase from settling. Stopping an
    /// idle session is a silent no-op.
    pub async fn stop(&self) -> Result<()> {
        let _guard = self.ops.lock().await;

        let (room, session_id, event_task) = {
            let mut state = self.state.lock().await;
            if state.phase == ConnectionPhase::Idle
                && state.room.is_none()
                && state.session_id.is_none()
            {
                return Ok(());
            }
            (
                state.room.take(),
                state.session_id.take(),
                state.event_task.take(),
            )
        };

        let mut teardown_error: Option<anyhow::Error> = None;

        if let Some(mut room) = room {
            info!("Disconnecting from media room");
            if let Err(err) = room.disconnect().await {
                warn!("Failed to disconnect media room: {:#}", err);
                teardown_error = Some(err.context("Failed to disconnect media room"));
            }
        }

        if let Some(session_id) = session_id {
            info!("Ending backend session {}", session_id);
            if let Err(err) = bounded(
                self.config.request_timeout,
                self.backend.end_session(&session_id),
            )
            .await
            {
                warn!("Failed to end backend session: {:#}", err);
                if teardown_error.is_none() {
                    teardown_error = Some(err.context("Failed to end backend session"));
                }
            }
        }

        if let Some(mut task) = event_task {
            // The event stream closed when the room went down, so the task
            // drains and exits on its own; the abort is a backstop against a
            // transport that keeps its channel open.
            match tokio::time::timeout(EVENT_TASK_GRACE, &mut task).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => error!("Room event task failed: {}", err),
                Err(_) => {
                    warn!("Room event task did not drain in time, aborting");
                    task.abort();
                }
            }
        }

        let message = teardown_error.as_ref().map(|err| format!("{err:#}"));
        {
            let mut state = self.state.lock().await;
            state.phase = ConnectionPhase::Idle;
            if let Some(message) = message {
                state.last_error = Some(message);
            }
            state.transcript.system(ENDED_NOTICE);
        }
        info!("Session stopped");

        match teardown_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Reset the transcript to empty, whatever the connection phase.
    pub async fn clear_transcript(&self) {
        self.state.lock().await.transcript.clear();
    }

    /// Consistent snapshot of the whole session for presentation layers.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        SessionSnapshot {
            phase: state.phase,
            transcript: state.transcript.entries().to_vec(),
            last_error: state.last_error.clone(),
            session_id: state.session_id.clone(),
        }
    }
}

/// Consumes room events in arrival order, one at a time to completion.
async fn run_event_task(
    mut events: mpsc::Receiver<RoomEvent>,
    state: Arc<Mutex<SessionState>>,
    sink: Arc<Mutex<Box<dyn AudioSink>>>,
) {
    info!("Room event task started");

    while let Some(event) = events.recv().await {
        match event {
            RoomEvent::TrackSubscribed { track } => {
                if track.kind == TrackKind::Audio {
                    sink.lock().await.attach(&track);
                }
            }

            RoomEvent::TrackUnsubscribed { track } => {
                sink.lock().await.detach(&track.sid);
            }

            RoomEvent::DataReceived {
                participant,
                payload,
            } => match decode_transcription(&payload) {
                Ok(Some(transcription)) => {
                    let speaker =
                        participant.unwrap_or_else(|| DEFAULT_REMOTE_SPEAKER.to_string());
                    let mut state = state.lock().await;
                    state
                        .transcript
                        .reconcile(&speaker, &transcription.text, transcription.is_final);
                }
                Ok(None) => {}
                // Anything can show up on the data channel; a payload we
                // cannot parse is dropped, never surfaced as a session error.
                Err(err) => warn!("Ignoring malformed data message: {:#}", err),
            },

            RoomEvent::ParticipantConnected { identity } => {
                info!("Participant connected: {}", identity);
            }

            RoomEvent::Disconnected { reason } => {
                warn!(
                    "Disconnected from media room: {}",
                    reason.as_deref().unwrap_or("no reason given")
                );
                let mut state = state.lock().await;
                state.phase = ConnectionPhase::Idle;
                state.room = None;
            }
        }
    }

    info!("Room event task stopped");
}

async fn bounded<T>(limit: Duration, operation: impl Future<Output = Result<T>>) -> Result<T> {
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => anyhow::bail!("Timed out after {:?}", limit),
    }
}
