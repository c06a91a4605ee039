use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use deskscribe::{Config, Session};
use tracing::info;

/// Record the desk: capture microphone audio and screen video, transcribe,
/// summarize, and log window activity.
#[derive(Debug, Parser)]
#[command(name = "deskscribe", version)]
struct Args {
    /// Duration in seconds to record and track
    #[arg(long, default_value_t = 60)]
    duration: u64,

    /// Prefix for output files
    #[arg(long, default_value = "session")]
    prefix: String,

    /// Path to a configuration file (defaults to config/deskscribe.toml if present)
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    info!("Deskscribe v0.1.0");

    let session = Session::new(config)?;
    let paths = session
        .run(Duration::from_secs(args.duration), &args.prefix)
        .await?;

    println!(
        "Session complete.\nAudio: {}\nVideo: {}\nTranscript: {}\nSummary: {}\nActivity log: {}",
        paths.audio.display(),
        paths.video.display(),
        paths.transcript.display(),
        paths.summary.display(),
        paths.activity.display()
    );

    Ok(())
}
