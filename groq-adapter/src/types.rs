//! Shared data types for Groq adapter configuration, messages, and results.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::discovery::{env_override, resolve_api_key, BASE_URL_ENV_VAR, MODEL_ENV_VAR};
use crate::error::GroqError;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Base URL of Groq's OpenAI-compatible API.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Author of a chat message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions that frame the whole conversation.
    System,
    /// End-user input.
    User,
    /// Model output.
    Assistant,
}

/// A single message in a chat-completion conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// Who authored the message.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Creates a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Creates a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Output format requested from the model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// Free text.
    #[default]
    Text,
    /// A single JSON object (Groq's JSON mode).
    JsonObject,
}

/// Per-call overrides on top of [`GroqConfig`].
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// Sampling temperature (None = config default).
    pub temperature: Option<f32>,
    /// Completion token cap (None = config default).
    pub max_tokens: Option<u32>,
    /// Requested output format.
    pub response_format: ResponseFormat,
}

impl ChatOptions {
    /// Requests JSON-object output.
    #[must_use]
    pub const fn json() -> Self {
        Self {
            temperature: None,
            max_tokens: None,
            response_format: ResponseFormat::JsonObject,
        }
    }

    /// Overrides the sampling temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Configuration for a [`crate::GroqClient`].
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// Bearer token sent with every request.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// API base URL, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Default sampling temperature.
    pub temperature: f32,
    /// Default completion token cap.
    pub max_tokens: u32,
    /// Upper bound for a whole HTTP request.
    ///
    /// Default: 60 seconds
    pub request_timeout: Duration,
}

impl GroqConfig {
    /// Creates a configuration with the given key and default settings.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.7,
            max_tokens: 4000,
            request_timeout: Duration::from_secs(60),
        }
    }

    /// Builds a configuration from `GROQ_API_KEY`, `GROQ_MODEL` and `GROQ_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns `GroqError::MissingApiKey` when `GROQ_API_KEY` is unset.
    pub fn from_env() -> Result<Self, GroqError> {
        let mut config = Self::new(resolve_api_key(None)?);
        if let Some(model) = env_override(MODEL_ENV_VAR) {
            config.model = model;
        }
        if let Some(base_url) = env_override(BASE_URL_ENV_VAR) {
            config.base_url = base_url;
        }
        Ok(config)
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the HTTP request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Full URL of the chat-completions endpoint.
    #[must_use]
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Token accounting reported by the API.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    /// Tokens in the prompt.
    #[serde(default)]
    pub prompt_tokens: u32,
    /// Tokens in the completion.
    #[serde(default)]
    pub completion_tokens: u32,
    /// Sum of both.
    #[serde(default)]
    pub total_tokens: u32,
}

/// Result of a successful chat-completion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResult {
    /// Text of the first choice.
    pub content: String,
    /// Model that produced the completion.
    pub model: String,
    /// Token usage, zeroed when the API omits it.
    pub usage: Usage,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Raw response body of `/chat/completions`.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    /// Model that produced the completion.
    #[serde(default)]
    pub model: Option<String>,
    /// Completion choices.
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Token usage.
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// One completion choice.
#[derive(Debug, Deserialize)]
pub struct Choice {
    /// Message produced for this choice.
    pub message: ResponseMessage,
    /// Why generation stopped (`stop`, `length`, ...).
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message inside a [`Choice`].
#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    /// Text content; absent for tool-call-only messages.
    #[serde(default)]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_match_groq_settings() {
        let config = GroqConfig::new("gsk_test");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, 4000);
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.request_timeout.as_secs(), 60);
    }

    #[test]
    fn test_completions_url_tolerates_trailing_slash() {
        let config = GroqConfig::new("k").with_base_url("http://localhost:8080/v1/");
        assert_eq!(
            config.completions_url(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_response_without_usage_still_decodes() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"hi"},"finish_reason":"stop"}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("hi"));
        assert!(parsed.usage.is_none());
    }

    #[test]
    fn test_roles_serialize_lowercase() {
        let json = serde_json::to_value(ChatMessage::system("x")).unwrap();
        assert_eq!(json["role"], "system");
    }
}
