//! Collaborators backing the analysis engine
//!
//! [`OpenAiClient`] talks to any OpenAI-compatible chat-completions
//! endpoint. [`FileResponseClient`] replays a stored reply, which keeps
//! offline runs and tests deterministic.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use aiolens_core::{AioPrompt, DetectedIndustry, IndustryDetector, LlmClient};
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const LLM_TIMEOUT: Duration = Duration::from_secs(180);

/// Connection settings for a chat-completions endpoint
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

fn chat_request<'a>(settings: &'a LlmSettings, prompt: &'a AioPrompt) -> ChatRequest<'a> {
    ChatRequest {
        model: &settings.model,
        messages: [
            ChatMessage {
                role: "system",
                content: &prompt.system,
            },
            ChatMessage {
                role: "user",
                content: &prompt.user,
            },
        ],
        temperature: settings.temperature,
        response_format: ResponseFormat {
            kind: "json_object",
        },
    }
}

/// Blocking client for an OpenAI-compatible API
pub struct OpenAiClient {
    http: reqwest::blocking::Client,
    settings: LlmSettings,
}

impl OpenAiClient {
    pub fn new(settings: LlmSettings) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(LLM_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http, settings })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.api_base.trim_end_matches('/')
        )
    }
}

impl LlmClient for OpenAiClient {
    fn complete(&self, prompt: &AioPrompt) -> Result<String> {
        let endpoint = self.endpoint();
        info!(model = %self.settings.model, "requesting AIO assessment");

        let response: ChatResponse = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.settings.api_key)
            .json(&chat_request(&self.settings, prompt))
            .send()
            .with_context(|| format!("failed to reach {endpoint}"))?
            .error_for_status()
            .with_context(|| format!("non-success status from {endpoint}"))?
            .json()
            .context("failed to decode chat completion")?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("chat completion contained no message"))?;
        debug!(chars = content.chars().count(), "received AIO assessment");
        Ok(content.trim().to_string())
    }
}

/// Replays a reply stored on disk
#[derive(Debug, Clone)]
pub struct FileResponseClient {
    path: PathBuf,
}

impl FileResponseClient {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LlmClient for FileResponseClient {
    fn complete(&self, _prompt: &AioPrompt) -> Result<String> {
        debug!(path = %self.path.display(), "using stored LLM response");
        fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read LLM response {}", self.path.display()))
    }
}

/// Detector that never reaches a verdict
///
/// Stands in until a classification model is wired in; the declared
/// industry, if any, is then taken as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDetector;

impl IndustryDetector for NullDetector {
    fn detect(
        &self,
        _title: &str,
        _content: &str,
        _meta_description: &str,
    ) -> Result<DetectedIndustry> {
        Ok(DetectedIndustry::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiolens_core::{Resolution, resolve_industry};
    use std::io::Write;

    fn settings() -> LlmSettings {
        LlmSettings {
            api_base: "https://llm.example.com/v1/".to_string(),
            api_key: "sk-test".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
        }
    }

    #[test]
    fn request_asks_for_a_json_object() {
        let prompt = AioPrompt {
            system: "sys".to_string(),
            user: "usr".to_string(),
        };
        let settings = settings();
        let body = serde_json::to_value(chat_request(&settings, &prompt)).unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "usr");
        assert_eq!(body["response_format"]["type"], "json_object");
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let client = OpenAiClient::new(settings()).unwrap();
        assert_eq!(client.endpoint(), "https://llm.example.com/v1/chat/completions");
    }

    #[test]
    fn reply_without_choices_decodes() {
        let reply: ChatResponse = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert!(reply.choices.is_empty());
    }

    #[test]
    fn file_client_replays_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"total_score\": 5}}").unwrap();
        let client = FileResponseClient::new(file.path());
        let prompt = AioPrompt {
            system: String::new(),
            user: String::new(),
        };
        assert_eq!(client.complete(&prompt).unwrap(), "{\"total_score\": 5}");
    }

    #[test]
    fn null_detector_defers_to_user_input() {
        let detected = NullDetector.detect("t", "c", "m").unwrap();
        assert_eq!(detected.confidence, 0.0);
        let verdict = resolve_industry(Some("legal"), &detected);
        assert_eq!(verdict.resolution, Resolution::UserOnly);
    }
}
