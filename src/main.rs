use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;
use voicelink::{
    Config, LoopbackTransport, MemoryBackend, PlaybackSink, SessionController, SessionSnapshot,
};

#[derive(Debug, Parser)]
#[command(name = "voicelink", about = "Real-time voice session client")]
struct Args {
    /// Config file, without extension (resolved by the config crate)
    #[arg(long, default_value = "config/voicelink")]
    config: String,

    /// Override the room name from the config file
    #[arg(long)]
    room: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    let mut session_config = cfg.session();
    if let Some(room) = args.room {
        session_config.room_name = room;
    }

    info!("Voicelink v0.1.0");
    info!("Backend: {}", cfg.backend.base_url);
    info!("Room: {}", session_config.room_name);

    // Local wiring: the loopback transport plays the media room and the
    // in-memory backend issues credentials and session ids, so the whole
    // lifecycle runs without external services.
    let backend = Arc::new(MemoryBackend::new());
    let transport = Arc::new(LoopbackTransport::new());
    let agent = transport.handle();

    let controller = SessionController::new(
        session_config,
        backend.clone(),
        transport.clone(),
        Box::new(PlaybackSink::new()),
    );

    controller.start().await?;
    render_latest(&controller.snapshot().await);

    // Scripted agent turn: partial results converging to the final text.
    let script: &[(&str, bool)] = &[
        ("Hello", false),
        ("Hello! How can I", false),
        ("Hello! How can I help you today?", true),
        ("Ask me anything about your account.", true),
    ];

    for (text, is_final) in script {
        agent
            .send_transcription(Some("agent-1"), text, *is_final)
            .await?;
        sleep(Duration::from_millis(200)).await;
        render_latest(&controller.snapshot().await);
    }

    controller.stop().await?;

    let snapshot = controller.snapshot().await;
    println!("\n--- transcript ---");
    for utterance in &snapshot.transcript {
        println!(
            "[{}] {}: {}",
            utterance.timestamp.format("%H:%M:%S"),
            utterance.speaker,
            utterance.text
        );
    }

    info!(
        "Ended {} backend session(s)",
        backend.ended_sessions().len()
    );

    Ok(())
}

/// Print the newest utterance: partials redraw in place, finals get a line.
fn render_latest(snapshot: &SessionSnapshot) {
    let Some(utterance) = snapshot.transcript.last() else {
        return;
    };

    if utterance.is_final {
        println!("\r{}: {}", utterance.speaker, utterance.text);
    } else {
        print!("\r{}: {}", utterance.speaker, utterance.text);
        std::io::Write::flush(&mut std::io::stdout()).ok();
    }
}
