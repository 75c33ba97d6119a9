use super::room::RemoteTrack;
use tracing::info;

/// Playback endpoint for remote audio.
///
/// There is exactly one sink per controller; remote audio tracks are
/// attached as they appear and detached when they go away. Device-level
/// audio output is outside this crate, behind whatever implements the trait.
pub trait AudioSink: Send {
    /// Route a remote track's audio to this sink.
    fn attach(&mut self, track: &RemoteTrack);

    /// Stop routing the track with the given sid.
    fn detach(&mut self, track_sid: &str);
}

/// Default sink: tracks what is attached and logs the routing changes.
#[derive(Debug, Default)]
pub struct PlaybackSink {
    attached: Vec<String>,
}

impl PlaybackSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sids of currently attached tracks.
    pub fn attached(&self) -> &[String] {
        &self.attached
    }
}

impl AudioSink for PlaybackSink {
    fn attach(&mut self, track: &RemoteTrack) {
        info!("Attaching audio track {} from {}", track.sid, track.participant);
        if !self.attached.iter().any(|sid| sid == &track.sid) {
            self.attached.push(track.sid.clone());
        }
    }

    fn detach(&mut self, track_sid: &str) {
        info!("Detaching audio track {}", track_sid);
        self.attached.retain(|sid| sid != track_sid);
    }
}
