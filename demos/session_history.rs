// Session History Example: fetch a persisted transcript over HTTP
//
// Exercises the real backend client against a running service:
// 1. Creates a session
// 2. Ends it immediately
// 3. Fetches whatever history the backend persisted for it
//
// Prerequisites:
// - Backend service running at http://localhost:8000 (or pass another base
//   URL as the first argument)
//
// Usage: cargo run --example session_history [base_url] [session_id]
//
// With a session_id argument the create/end steps are skipped and only the
// history of that session is fetched.

use anyhow::Result;
use voicelink::{BackendApi, HttpBackend};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let base_url = args
        .next()
        .unwrap_or_else(|| "http://localhost:8000".to_string());
    let session_id = args.next();

    let backend = HttpBackend::new(base_url);

    let session_id = match session_id {
        Some(id) => id,
        None => {
            let session = backend.create_session(None).await?;
            println!("created session {}", session.session_id);
            backend.end_session(&session.session_id).await?;
            println!("ended session {}", session.session_id);
            session.session_id
        }
    };

    let history = backend.session_history(&session_id).await?;
    println!("{} persisted utterance(s)", history.len());
    for entry in history {
        println!("[{}] {}: {}", entry.timestamp, entry.speaker, entry.text);
    }

    Ok(())
}
