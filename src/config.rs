use serde::Deserialize;

use crate::error::{Error, Result};

/// Default location of the optional configuration file (extension resolved by
/// the config crate, e.g. `config/deskscribe.toml`).
const DEFAULT_CONFIG_PATH: &str = "config/deskscribe";

/// Environment variable holding the API credential shared by the
/// transcription and summarization collaborators.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub audio: AudioSettings,
    pub screen: ScreenSettings,
    pub activity: ActivitySettings,
    pub api: ApiSettings,
}

/// Microphone capture settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AudioSettings {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u16,
}

/// Screen capture settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ScreenSettings {
    /// Frames per second for the screen recording
    pub fps: u32,
}

/// Window-activity sampling settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivitySettings {
    /// Seconds between foreground-window polls
    pub interval_secs: f64,
}

/// Settings for the transcription and summarization API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Model for `audio/transcriptions`
    pub transcribe_model: String,
    /// Model for `chat/completions`
    pub summary_model: String,
    /// Maximum tokens in the generated summary
    pub summary_max_tokens: u32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 2,
        }
    }
}

impl Config {
    /// Load configuration from built-in defaults plus an optional TOML file.
    ///
    /// An explicitly supplied path must exist; the default path
    /// (`config/deskscribe`) is overlaid only when present.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let file = match path {
            Some(p) => config::File::with_name(p).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_PATH).required(false),
        };

        let settings = config::Config::builder()
            .set_default("audio.sample_rate", 44100)?
            .set_default("audio.channels", 2)?
            .set_default("screen.fps", 20)?
            .set_default("activity.interval_secs", 1.0)?
            .set_default("api.base_url", "https://api.openai.com/v1")?
            .set_default("api.transcribe_model", "whisper-1")?
            .set_default("api.summary_model", "gpt-3.5-turbo")?
            .set_default("api.summary_max_tokens", 150)?
            .add_source(file)
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

/// Credential for the external API, read from the environment.
///
/// Resolved once at session construction, before any capture starts or any
/// network call is attempted.
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub api_key: String,
}

impl ApiCredentials {
    pub fn from_env() -> Result<Self> {
        match std::env::var(API_KEY_VAR) {
            Ok(key) if !key.trim().is_empty() => Ok(Self { api_key: key }),
            _ => Err(Error::Configuration(format!(
                "{API_KEY_VAR} environment variable not set"
            ))),
        }
    }
}
