//! Voice session lifecycle
//!
//! This module provides the `SessionController` abstraction that manages:
//! - Access credential acquisition and backend session creation
//! - Media room connection and microphone publication
//! - Room event handling (audio tracks, transcriptions, disconnects)
//! - Teardown of everything the session acquired
//! - A consistent read-only snapshot for presentation layers

mod config;
mod controller;
mod snapshot;

pub use config::SessionConfig;
pub use controller::SessionController;
pub use snapshot::{ConnectionPhase, SessionSnapshot};
