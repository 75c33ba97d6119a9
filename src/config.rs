use crate::session::SessionConfig;
use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    pub room: RoomConfig,
    pub timeouts: TimeoutConfig,
}

#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct RoomConfig {
    pub name: String,
    pub participant_prefix: String,
    pub adaptive_stream: bool,
    pub dynacast: bool,
}

#[derive(Debug, Deserialize)]
pub struct TimeoutConfig {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Session settings derived from the loaded file.
    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            room_name: self.room.name.clone(),
            participant_prefix: self.room.participant_prefix.clone(),
            adaptive_stream: self.room.adaptive_stream,
            dynacast: self.room.dynacast,
            request_timeout: Duration::from_secs(self.timeouts.request_secs),
            connect_timeout: Duration::from_secs(self.timeouts.connect_secs),
        }
    }
}
