use std::sync::Arc;
use std::time::Duration;

use tokio::task;
use tracing::info;

use crate::activity::{track_activity, ForegroundWindow, WindowQuery};
use crate::config::{ApiCredentials, Config};
use crate::error::{Error, Result};
use crate::summarize::{ChatSummarizer, Summarizer};
use crate::transcribe::{Transcriber, WhisperApiTranscriber};

use super::capture::{CaptureBackend, DeviceCapture};
use super::paths::SessionPaths;

/// One end-to-end session: capture, transcribe, summarize, track activity,
/// persist.
///
/// Collaborators sit behind traits so tests can substitute doubles for the
/// hardware and network dependencies.
pub struct Session {
    config: Config,
    capture: Box<dyn CaptureBackend>,
    transcriber: Box<dyn Transcriber>,
    summarizer: Box<dyn Summarizer>,
    windows: Arc<dyn WindowQuery>,
}

impl Session {
    /// Wire up the production collaborators.
    ///
    /// The API credential is resolved here, before any capture starts or any
    /// network call is attempted; its absence fails the session immediately.
    pub fn new(config: Config) -> Result<Self> {
        let credentials = ApiCredentials::from_env()?;

        Ok(Self {
            capture: Box::new(DeviceCapture::new(
                config.audio.clone(),
                config.screen.clone(),
            )),
            transcriber: Box::new(WhisperApiTranscriber::new(&config.api, &credentials)),
            summarizer: Box::new(ChatSummarizer::new(&config.api, &credentials)),
            windows: Arc::new(ForegroundWindow),
            config,
        })
    }

    /// Assemble a session from explicit collaborators.
    pub fn with_parts(
        config: Config,
        capture: Box<dyn CaptureBackend>,
        transcriber: Box<dyn Transcriber>,
        summarizer: Box<dyn Summarizer>,
        windows: Arc<dyn WindowQuery>,
    ) -> Self {
        Self {
            config,
            capture,
            transcriber,
            summarizer,
            windows,
        }
    }

    /// Run a complete session.
    ///
    /// Stage order: concurrent audio+screen capture, transcription,
    /// summarization, then activity tracking for another `duration`. The
    /// sampler runs after the earlier stages rather than alongside capture,
    /// so total wall-clock time is capture-time plus the collaborator calls
    /// plus `duration` again.
    ///
    /// Each artifact is written exactly once, at the end of the stage that
    /// produces it. Any stage failure aborts the remaining pipeline; files
    /// written by completed stages remain on disk.
    pub async fn run(&self, duration: Duration, prefix: &str) -> Result<SessionPaths> {
        let paths = SessionPaths::for_prefix(prefix);
        info!("Starting session: prefix={prefix}, duration={}s", duration.as_secs_f64());

        self.capture
            .capture(&paths.audio, &paths.video, duration)
            .await?;

        let transcript = self.transcriber.transcribe(&paths.audio).await?;
        tokio::fs::write(&paths.transcript, &transcript).await?;
        info!("Transcript saved: {}", paths.transcript.display());

        let summary = self.summarizer.summarize(&transcript).await?;
        tokio::fs::write(&paths.summary, &summary).await?;
        info!("Summary saved: {}", paths.summary.display());

        let windows = Arc::clone(&self.windows);
        let interval = Duration::from_secs_f64(self.config.activity.interval_secs);
        let samples = task::spawn_blocking(move || {
            track_activity(windows.as_ref(), duration, interval)
        })
        .await
        .map_err(|e| Error::Capture(format!("activity tracking task panicked: {e}")))?;

        let log = serde_json::to_string_pretty(&samples)?;
        tokio::fs::write(&paths.activity, log).await?;
        info!("Activity log saved: {}", paths.activity.display());

        Ok(paths)
    }
}
