use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::{self, JoinError};
use tracing::info;

use crate::audio::record_audio;
use crate::config::{AudioSettings, ScreenSettings};
use crate::error::{Error, Result};
use crate::screen::record_screen;

/// Locations of the completed capture artifacts. Produced exactly once per
/// session, after both capture tasks have finished.
#[derive(Debug, Clone)]
pub struct CaptureResult {
    pub audio_path: PathBuf,
    pub video_path: PathBuf,
}

fn flatten(result: std::result::Result<Result<()>, JoinError>, task: &str) -> Result<()> {
    result.map_err(|e| Error::Capture(format!("{task} capture task panicked: {e}")))?
}

/// Run the audio and screen capture tasks concurrently and wait for BOTH to
/// finish (join semantics, not first-to-finish).
///
/// The tasks share no mutable state: they write distinct files and touch
/// distinct hardware. If either fails, the first failure (audio checked
/// first) is surfaced after both have completed; output already written by
/// the other task is left on disk; there is no rollback.
pub async fn join_captures<A, V>(audio: A, video: V) -> Result<()>
where
    A: FnOnce() -> Result<()> + Send + 'static,
    V: FnOnce() -> Result<()> + Send + 'static,
{
    let audio_task = task::spawn_blocking(audio);
    let video_task = task::spawn_blocking(video);

    let (audio_result, video_result) = tokio::join!(audio_task, video_task);

    flatten(audio_result, "audio")?;
    flatten(video_result, "screen")?;
    Ok(())
}

/// Concurrent capture coordinator.
#[async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Record audio and screen for `duration`, blocking until both are done.
    async fn capture(
        &self,
        audio_path: &Path,
        video_path: &Path,
        duration: Duration,
    ) -> Result<CaptureResult>;
}

/// Production capture backend: default microphone + primary display.
pub struct DeviceCapture {
    audio: AudioSettings,
    screen: ScreenSettings,
}

impl DeviceCapture {
    pub fn new(audio: AudioSettings, screen: ScreenSettings) -> Self {
        Self { audio, screen }
    }
}

#[async_trait]
impl CaptureBackend for DeviceCapture {
    async fn capture(
        &self,
        audio_path: &Path,
        video_path: &Path,
        duration: Duration,
    ) -> Result<CaptureResult> {
        info!(
            "Starting concurrent capture for {:.1}s",
            duration.as_secs_f64()
        );

        let audio_settings = self.audio.clone();
        let screen_settings = self.screen.clone();
        let audio_target = audio_path.to_path_buf();
        let video_target = video_path.to_path_buf();

        join_captures(
            move || record_audio(&audio_target, duration, &audio_settings),
            move || record_screen(&video_target, duration, &screen_settings),
        )
        .await?;

        info!("Concurrent capture complete");

        Ok(CaptureResult {
            audio_path: audio_path.to_path_buf(),
            video_path: video_path.to_path_buf(),
        })
    }
}
