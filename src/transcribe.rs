use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use tracing::info;

use crate::config::{ApiCredentials, ApiSettings};
use crate::error::{Error, Result};

/// Converts an audio file into plain text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_path: &Path) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Transcription client for an OpenAI-compatible `audio/transcriptions`
/// endpoint.
pub struct WhisperApiTranscriber {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl WhisperApiTranscriber {
    pub fn new(settings: &ApiSettings, credentials: &ApiCredentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/audio/transcriptions", settings.base_url),
            model: settings.transcribe_model.clone(),
            api_key: credentials.api_key.clone(),
        }
    }
}

#[async_trait]
impl Transcriber for WhisperApiTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        info!("Transcribing {} ...", audio_path.display());

        let bytes = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.wav".to_string());

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("audio/wav")
            .map_err(|e| Error::ExternalService(format!("invalid upload part: {e}")))?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone());

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ExternalService(format!(
                "transcription request failed ({status}): {}",
                body.trim()
            )));
        }

        let parsed: TranscriptionResponse = response.json().await?;
        info!("Transcription complete: {} chars", parsed.text.len());
        Ok(parsed.text)
    }
}
