//! Backend service client
//!
//! The backend issues room access credentials and persists voice sessions.
//! The controller only sees the `BackendApi` trait; `HttpBackend` is the
//! real REST client and `MemoryBackend` an in-process stand-in for
//! development and tests.

mod api;
mod http;
mod memory;
pub mod types;

pub use api::BackendApi;
pub use http::HttpBackend;
pub use memory::MemoryBackend;
