use super::data::{DataMessage, TRANSCRIPTION_TYPE};
use super::room::{MediaRoom, MediaTransport, RoomEvent, RoomOptions};
use anyhow::{bail, Context, Result};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::info;

/// Buffered events between room creation and the consumer task starting.
const EVENT_BUFFER: usize = 64;

#[derive(Debug, Default)]
struct Shared {
    sender: Option<mpsc::Sender<RoomEvent>>,
    connected: bool,
    microphone_enabled: bool,
    fail_connect: bool,
    fail_microphone: bool,
}

/// In-process media transport.
///
/// Stands in for a network transport during development and in tests: the
/// room "connects" immediately and the paired [`LoopbackHandle`] plays the
/// remote side, feeding room events (agent transcriptions, tracks, forced
/// disconnects) into the same channel a real transport would use.
#[derive(Default)]
pub struct LoopbackTransport {
    shared: Arc<Mutex<Shared>>,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remote-side handle for this transport. Clones share the same room.
    pub fn handle(&self) -> LoopbackHandle {
        LoopbackHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

#[async_trait::async_trait]
impl MediaTransport for LoopbackTransport {
    fn name(&self) -> &str {
        "loopback"
    }

    async fn create_room(
        &self,
        options: RoomOptions,
    ) -> Result<(Box<dyn MediaRoom>, mpsc::Receiver<RoomEvent>)> {
        info!(
            "Creating loopback room (adaptive_stream={}, dynacast={})",
            options.adaptive_stream, options.dynacast
        );

        let (sender, receiver) = mpsc::channel(EVENT_BUFFER);

        {
            let mut shared = self.shared.lock().expect("loopback state poisoned");
            shared.sender = Some(sender);
            shared.connected = false;
            shared.microphone_enabled = false;
        }

        let room = LoopbackRoom {
            shared: Arc::clone(&self.shared),
        };

        Ok((Box::new(room), receiver))
    }
}

struct LoopbackRoom {
    shared: Arc<Mutex<Shared>>,
}

#[async_trait::async_trait]
impl MediaRoom for LoopbackRoom {
    async fn connect(&mut self, url: &str, _token: &str) -> Result<()> {
        let mut shared = self.shared.lock().expect("loopback state poisoned");
        if shared.fail_connect {
            shared.fail_connect = false;
            bail!("Loopback room refused connection to {}", url);
        }
        shared.connected = true;
        Ok(())
    }

    async fn set_microphone_enabled(&mut self, enabled: bool) -> Result<()> {
        let mut shared = self.shared.lock().expect("loopback state poisoned");
        if enabled && shared.fail_microphone {
            shared.fail_microphone = false;
            bail!("Loopback room refused microphone publication");
        }
        shared.microphone_enabled = enabled;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        let mut shared = self.shared.lock().expect("loopback state poisoned");
        shared.connected = false;
        shared.microphone_enabled = false;
        // Dropping the sender closes the event stream, which is what tells
        // the session's event task the room is gone.
        shared.sender = None;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.shared.lock().expect("loopback state poisoned").connected
    }
}

impl Drop for LoopbackRoom {
    fn drop(&mut self) {
        // A discarded handle must not keep the event channel alive.
        if let Ok(mut shared) = self.shared.lock() {
            shared.connected = false;
            shared.sender = None;
        }
    }
}

/// Remote side of a [`LoopbackTransport`] room.
#[derive(Clone)]
pub struct LoopbackHandle {
    shared: Arc<Mutex<Shared>>,
}

impl LoopbackHandle {
    /// Make the next room connection fail (network/auth failure stand-in).
    /// One-shot: the attempt after the failed one proceeds normally.
    pub fn fail_connect(&self) {
        self.shared.lock().expect("loopback state poisoned").fail_connect = true;
    }

    /// Make the next microphone publication fail. One-shot.
    pub fn fail_microphone(&self) {
        self.shared.lock().expect("loopback state poisoned").fail_microphone = true;
    }

    pub fn is_connected(&self) -> bool {
        self.shared.lock().expect("loopback state poisoned").connected
    }

    pub fn microphone_enabled(&self) -> bool {
        self.shared
            .lock()
            .expect("loopback state poisoned")
            .microphone_enabled
    }

    /// Emit a room event as the remote side.
    pub async fn send_event(&self, event: RoomEvent) -> Result<()> {
        let sender = {
            let shared = self.shared.lock().expect("loopback state poisoned");
            shared.sender.clone()
        };

        let sender = sender.context("No loopback room exists")?;
        sender
            .send(event)
            .await
            .context("Loopback event channel closed")?;
        Ok(())
    }

    /// Emit a raw data-channel payload from the given participant.
    pub async fn send_data(&self, participant: Option<&str>, payload: Vec<u8>) -> Result<()> {
        self.send_event(RoomEvent::DataReceived {
            participant: participant.map(str::to_string),
            payload,
        })
        .await
    }

    /// Emit a well-formed transcription event from the given participant.
    pub async fn send_transcription(
        &self,
        participant: Option<&str>,
        text: &str,
        is_final: bool,
    ) -> Result<()> {
        let message = DataMessage {
            kind: TRANSCRIPTION_TYPE.to_string(),
            text: text.to_string(),
            is_final,
        };
        let payload = serde_json::to_vec(&message)?;
        self.send_data(participant, payload).await
    }

    /// Drop the connection from the remote side: emits `Disconnected`, then
    /// closes the event stream.
    pub async fn drop_connection(&self, reason: &str) -> Result<()> {
        let sender = {
            let mut shared = self.shared.lock().expect("loopback state poisoned");
            shared.connected = false;
            shared.microphone_enabled = false;
            shared.sender.take()
        };

        let sender = sender.context("No loopback room exists")?;
        sender
            .send(RoomEvent::Disconnected {
                reason: Some(reason.to_string()),
            })
            .await
            .context("Loopback event channel closed")?;
        Ok(())
    }
}
