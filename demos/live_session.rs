// Live Session Example: full lifecycle against the loopback transport
//
// This example demonstrates the complete session flow:
// 1. Credential + backend session come from the in-memory backend
// 2. The controller joins a loopback media room and publishes the microphone
// 3. The remote side streams partial transcriptions that converge to finals
// 4. An audio track appears and is attached to the playback sink
// 5. The remote side drops the connection; the controller settles to idle
//
// No external services are required.
//
// Usage: cargo run --example live_session

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use voicelink::{
    LoopbackTransport, MemoryBackend, PlaybackSink, RemoteTrack, RoomEvent, SessionConfig,
    SessionController, TrackKind,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let backend = Arc::new(MemoryBackend::new());
    let transport = Arc::new(LoopbackTransport::new());
    let agent = transport.handle();

    let controller = SessionController::new(
        SessionConfig::default(),
        backend.clone(),
        transport.clone(),
        Box::new(PlaybackSink::new()),
    );

    controller.start().await?;

    // The agent joins and publishes its audio track.
    agent
        .send_event(RoomEvent::ParticipantConnected {
            identity: "agent-1".to_string(),
        })
        .await?;
    agent
        .send_event(RoomEvent::TrackSubscribed {
            track: RemoteTrack {
                sid: "TR_agent_audio".to_string(),
                kind: TrackKind::Audio,
                participant: "agent-1".to_string(),
            },
        })
        .await?;

    // A short conversation: the user's words come back transcribed, the
    // agent answers, both as partials first.
    let turns: &[(&str, &[(&str, bool)])] = &[
        (
            "user-demo",
            &[
                ("What are the", false),
                ("What are the opening hours?", true),
            ],
        ),
        (
            "agent-1",
            &[
                ("We are open", false),
                ("We are open every day", false),
                ("We are open every day from nine to five.", true),
            ],
        ),
    ];

    for &(speaker, events) in turns {
        for &(text, is_final) in events {
            agent.send_transcription(Some(speaker), text, is_final).await?;
            sleep(Duration::from_millis(150)).await;
        }
    }

    print_transcript(&controller).await;

    // Remote side hangs up; no stop() was called locally.
    agent.drop_connection("agent ended the call").await?;
    sleep(Duration::from_millis(100)).await;

    let snapshot = controller.snapshot().await;
    println!(
        "after remote hangup: connected={} connecting={}",
        snapshot.is_connected(),
        snapshot.is_connecting()
    );

    // stop() still ends the backend session that the hangup left behind.
    controller.stop().await?;
    println!("ended sessions: {:?}", backend.ended_sessions());

    Ok(())
}

async fn print_transcript(controller: &SessionController) {
    println!("--- transcript ---");
    for utterance in &controller.snapshot().await.transcript {
        let marker = if utterance.is_final { " " } else { "~" };
        println!("{}{}: {}", marker, utterance.speaker, utterance.text);
    }
}
