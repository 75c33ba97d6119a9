use anyhow::Result;
use tokio::sync::mpsc;

/// Room configuration passed to [`MediaTransport::create_room`].
#[derive(Debug, Clone)]
pub struct RoomOptions {
    /// Let the transport adapt stream quality to network conditions
    pub adaptive_stream: bool,
    /// Only cast tracks that somebody is subscribed to
    pub dynacast: bool,
}

impl Default for RoomOptions {
    fn default() -> Self {
        Self {
            adaptive_stream: true,
            dynacast: true,
        }
    }
}

/// Kind of a remote track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    Video,
}

/// A remote participant's published track, as seen by this client.
#[derive(Debug, Clone)]
pub struct RemoteTrack {
    /// Transport-assigned track identifier
    pub sid: String,
    pub kind: TrackKind,
    /// Identity of the participant publishing the track
    pub participant: String,
}

/// Events emitted by a media room, delivered in arrival order.
#[derive(Debug, Clone)]
pub enum RoomEvent {
    /// A remote track became available for playback
    TrackSubscribed { track: RemoteTrack },

    /// A remote track went away
    TrackUnsubscribed { track: RemoteTrack },

    /// An opaque data-channel message arrived. `participant` is the sender
    /// identity when the transport knows it.
    DataReceived {
        participant: Option<String>,
        payload: Vec<u8>,
    },

    /// A remote participant joined the room
    ParticipantConnected { identity: String },

    /// The transport lost or closed the connection (network loss, remote
    /// side hung up). After this the room handle is dead.
    Disconnected { reason: Option<String> },
}

/// Factory for media rooms.
#[async_trait::async_trait]
pub trait MediaTransport: Send + Sync {
    /// Transport name for logging
    fn name(&self) -> &str;

    /// Create a (not yet connected) room handle.
    ///
    /// The returned receiver carries every event the room ever emits,
    /// buffered from the moment of creation, so a consumer spawned after
    /// `connect` still sees events that fired during connection.
    async fn create_room(
        &self,
        options: RoomOptions,
    ) -> Result<(Box<dyn MediaRoom>, mpsc::Receiver<RoomEvent>)>;
}

/// A live media room connection.
///
/// Exclusively owned by whoever drives the session; must be disconnected
/// before being discarded.
#[async_trait::async_trait]
pub trait MediaRoom: Send + Sync {
    /// Join the room at `url` using the issued access token.
    async fn connect(&mut self, url: &str, token: &str) -> Result<()>;

    /// Enable or disable capture and publishing of the local microphone.
    async fn set_microphone_enabled(&mut self, enabled: bool) -> Result<()>;

    /// Leave the room. The event channel closes once the room is down.
    async fn disconnect(&mut self) -> Result<()>;

    /// Whether the room is currently connected.
    fn is_connected(&self) -> bool;
}
