// Integration tests for the session orchestrator
//
// These tests run full sessions against double collaborators: no microphone,
// display, or network is touched. They verify the artifact set, the stage
// ordering on failure, and the credential check.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use deskscribe::activity::WindowQuery;
use deskscribe::config::{
    ActivitySettings, ApiCredentials, ApiSettings, AudioSettings, Config, ScreenSettings,
    API_KEY_VAR,
};
use deskscribe::error::Error;
use deskscribe::session::{CaptureBackend, CaptureResult, Session, SessionPaths};
use deskscribe::summarize::Summarizer;
use deskscribe::transcribe::Transcriber;
use serial_test::serial;
use tempfile::TempDir;

const TRANSCRIPT_TEXT: &str = "we discussed the quarterly roadmap";
const SUMMARY_TEXT: &str = "Roadmap discussion.";

fn test_config() -> Config {
    Config {
        audio: AudioSettings {
            sample_rate: 8000,
            channels: 1,
        },
        screen: ScreenSettings { fps: 10 },
        activity: ActivitySettings {
            interval_secs: 0.05,
        },
        api: ApiSettings {
            base_url: "https://api.openai.com/v1".to_string(),
            transcribe_model: "whisper-1".to_string(),
            summary_model: "gpt-3.5-turbo".to_string(),
            summary_max_tokens: 150,
        },
    }
}

/// Capture double: writes placeholder artifacts instead of recording.
struct FakeCapture;

#[async_trait]
impl CaptureBackend for FakeCapture {
    async fn capture(
        &self,
        audio_path: &Path,
        video_path: &Path,
        _duration: Duration,
    ) -> deskscribe::Result<CaptureResult> {
        tokio::fs::write(audio_path, b"RIFF").await?;
        tokio::fs::write(video_path, b"AVI ").await?;
        Ok(CaptureResult {
            audio_path: audio_path.to_path_buf(),
            video_path: video_path.to_path_buf(),
        })
    }
}

struct FakeTranscriber;

#[async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe(&self, _audio_path: &Path) -> deskscribe::Result<String> {
        Ok(TRANSCRIPT_TEXT.to_string())
    }
}

struct FailingTranscriber;

#[async_trait]
impl Transcriber for FailingTranscriber {
    async fn transcribe(&self, _audio_path: &Path) -> deskscribe::Result<String> {
        Err(Error::ExternalService("model unavailable".to_string()))
    }
}

/// Summarizer double that counts how often it is invoked.
struct CountingSummarizer {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Summarizer for CountingSummarizer {
    async fn summarize(&self, _text: &str) -> deskscribe::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(SUMMARY_TEXT.to_string())
    }
}

struct FixedWindows;

impl WindowQuery for FixedWindows {
    fn active_window_title(&self) -> Option<String> {
        Some("Terminal".to_string())
    }
}

fn test_session(summary_calls: Arc<AtomicUsize>) -> Session {
    Session::with_parts(
        test_config(),
        Box::new(FakeCapture),
        Box::new(FakeTranscriber),
        Box::new(CountingSummarizer {
            calls: summary_calls,
        }),
        Arc::new(FixedWindows),
    )
}

#[tokio::test]
async fn test_session_produces_exactly_five_artifacts() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let prefix = temp_dir.path().join("t");
    let prefix = prefix.to_str().unwrap();

    let session = test_session(Arc::new(AtomicUsize::new(0)));
    let paths = session.run(Duration::from_millis(200), prefix).await?;

    for (path, name) in [
        (&paths.audio, "t_audio.wav"),
        (&paths.video, "t_screen.avi"),
        (&paths.transcript, "t_transcript.txt"),
        (&paths.summary, "t_summary.txt"),
        (&paths.activity, "t_activity.json"),
    ] {
        assert!(path.exists(), "Missing artifact: {}", path.display());
        assert_eq!(path.file_name().unwrap().to_str().unwrap(), name);
    }

    assert_eq!(std::fs::read_to_string(&paths.transcript)?, TRANSCRIPT_TEXT);
    assert_eq!(std::fs::read_to_string(&paths.summary)?, SUMMARY_TEXT);

    Ok(())
}

#[tokio::test]
async fn test_activity_log_is_pretty_printed_records() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let prefix = temp_dir.path().join("log");
    let prefix = prefix.to_str().unwrap();

    let session = test_session(Arc::new(AtomicUsize::new(0)));
    let paths = session.run(Duration::from_millis(200), prefix).await?;

    let raw = std::fs::read_to_string(&paths.activity)?;
    let records: Vec<serde_json::Value> = serde_json::from_str(&raw)?;

    assert!(!records.is_empty(), "200ms at 50ms intervals should record samples");
    for record in &records {
        assert!(record["timestamp"].is_number());
        assert_eq!(record["title"], "Terminal");
    }
    assert!(
        raw.contains("\n  "),
        "Activity log should be pretty-printed with 2-space indent"
    );

    Ok(())
}

#[tokio::test]
async fn test_zero_duration_session_still_writes_all_artifacts() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let prefix = temp_dir.path().join("zero");
    let prefix = prefix.to_str().unwrap();

    let session = test_session(Arc::new(AtomicUsize::new(0)));
    let paths = session.run(Duration::ZERO, prefix).await?;

    assert!(paths.audio.exists());
    assert!(paths.video.exists());
    assert!(paths.transcript.exists());
    assert!(paths.summary.exists());

    let records: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(&paths.activity)?)?;
    assert!(records.is_empty(), "Zero duration yields an empty activity log");

    Ok(())
}

#[tokio::test]
async fn test_transcription_failure_aborts_but_keeps_capture_artifacts() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let prefix = temp_dir.path().join("fail");
    let prefix = prefix.to_str().unwrap();

    let summary_calls = Arc::new(AtomicUsize::new(0));
    let session = Session::with_parts(
        test_config(),
        Box::new(FakeCapture),
        Box::new(FailingTranscriber),
        Box::new(CountingSummarizer {
            calls: Arc::clone(&summary_calls),
        }),
        Arc::new(FixedWindows),
    );

    let result = session.run(Duration::from_millis(100), prefix).await;
    assert!(result.is_err(), "A failed stage must abort the session");

    let paths = SessionPaths::for_prefix(prefix);
    assert!(paths.audio.exists(), "Capture output is left on disk");
    assert!(paths.video.exists(), "Capture output is left on disk");
    assert!(!paths.transcript.exists(), "No transcript after a failed transcription");
    assert!(!paths.summary.exists());
    assert!(!paths.activity.exists());

    assert_eq!(
        summary_calls.load(Ordering::SeqCst),
        0,
        "Later stages must never run after an earlier failure"
    );

    Ok(())
}

#[test]
fn test_session_paths_derive_from_prefix() {
    let paths = SessionPaths::for_prefix("t");

    assert_eq!(paths.audio.to_str().unwrap(), "t_audio.wav");
    assert_eq!(paths.video.to_str().unwrap(), "t_screen.avi");
    assert_eq!(paths.transcript.to_str().unwrap(), "t_transcript.txt");
    assert_eq!(paths.summary.to_str().unwrap(), "t_summary.txt");
    assert_eq!(paths.activity.to_str().unwrap(), "t_activity.json");
}

#[test]
#[serial]
fn test_missing_credential_fails_before_any_call() {
    std::env::remove_var(API_KEY_VAR);

    match Session::new(test_config()) {
        Err(Error::Configuration(msg)) => {
            assert!(msg.contains(API_KEY_VAR), "Error should name the variable: {msg}")
        }
        Err(other) => panic!("Expected a configuration error, got {other:?}"),
        Ok(_) => panic!("Session construction must fail without a credential"),
    }
}

#[test]
#[serial]
fn test_credential_is_read_from_environment() {
    std::env::set_var(API_KEY_VAR, "sk-test");

    let credentials = ApiCredentials::from_env().expect("Credential should be accepted");
    assert_eq!(credentials.api_key, "sk-test");

    std::env::remove_var(API_KEY_VAR);
}
