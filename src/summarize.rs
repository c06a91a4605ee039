use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{ApiCredentials, ApiSettings};
use crate::error::{Error, Result};

const SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes meeting transcripts.";
const TEMPERATURE: f32 = 0.3;

/// Converts transcript text into a short summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Summarization client for an OpenAI-compatible `chat/completions` endpoint.
pub struct ChatSummarizer {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    max_tokens: u32,
    api_key: String,
}

impl ChatSummarizer {
    pub fn new(settings: &ApiSettings, credentials: &ApiCredentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/chat/completions", settings.base_url),
            model: settings.summary_model.clone(),
            max_tokens: settings.summary_max_tokens,
            api_key: credentials.api_key.clone(),
        }
    }
}

#[async_trait]
impl Summarizer for ChatSummarizer {
    async fn summarize(&self, text: &str) -> Result<String> {
        info!("Summarizing transcript ({} chars) ...", text.len());

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: text.to_string(),
                },
            ],
            max_tokens: self.max_tokens,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ExternalService(format!(
                "summarization request failed ({status}): {}",
                body.trim()
            )));
        }

        let parsed: ChatResponse = response.json().await?;
        let summary = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| {
                Error::ExternalService("summarization response contained no choices".to_string())
            })?;

        info!("Summary generated: {} chars", summary.len());
        Ok(summary)
    }
}
