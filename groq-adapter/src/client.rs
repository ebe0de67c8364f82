use std::time::{Duration, Instant};

use crate::error::GroqError;
use crate::request::{api_error_message, build_request};
use crate::types::{ChatCompletionResponse, ChatMessage, ChatOptions, ChatResult, GroqConfig};

/// High-level client for Groq chat completions.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct GroqClient {
    http: reqwest::Client,
    config: GroqConfig,
}

impl std::fmt::Debug for GroqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqClient")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl GroqClient {
    /// Creates a client from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns `GroqError::MissingApiKey` for a blank key, or
    /// `GroqError::ClientBuild` if the TLS backend fails to initialize.
    pub fn new(config: GroqConfig) -> Result<Self, GroqError> {
        if config.api_key.trim().is_empty() {
            return Err(GroqError::MissingApiKey("API key is blank".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GroqError::ClientBuild(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Creates a client configured from the environment.
    ///
    /// # Errors
    ///
    /// See [`GroqConfig::from_env`] and [`GroqClient::new`].
    pub fn from_env() -> Result<Self, GroqError> {
        Self::new(GroqConfig::from_env()?)
    }

    /// The configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &GroqConfig {
        &self.config
    }

    /// Sends a conversation and returns the first completion's text.
    ///
    /// # Errors
    ///
    /// Returns `GroqError::Timeout` when the request exceeds the configured
    /// bound, `GroqError::Transport` for connection failures,
    /// `GroqError::Http` for non-success statuses, and `GroqError::Decode` /
    /// `GroqError::EmptyResponse` for unusable bodies.
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatResult, GroqError> {
        let body = build_request(&self.config, messages, options);
        let url = self.config.completions_url();
        let start = Instant::now();

        tracing::debug!(model = %self.config.model, messages = messages.len(), "Sending Groq chat completion");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify(&e, self.config.request_timeout))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| classify(&e, self.config.request_timeout))?;

        if !status.is_success() {
            let message = api_error_message(&text);
            tracing::warn!(status = status.as_u16(), %message, "Groq API returned an error status");
            return Err(GroqError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&text).map_err(|e| GroqError::Decode(e.to_string()))?;
        let result = into_result(parsed, &self.config.model, start.elapsed())?;

        tracing::debug!(
            duration_ms = result.duration_ms,
            total_tokens = result.usage.total_tokens,
            "Groq chat completion finished"
        );

        Ok(result)
    }
}

fn classify(err: &reqwest::Error, timeout: Duration) -> GroqError {
    if err.is_timeout() {
        GroqError::Timeout(timeout)
    } else {
        GroqError::Transport(err.to_string())
    }
}

fn into_result(
    response: ChatCompletionResponse,
    requested_model: &str,
    elapsed: Duration,
) -> Result<ChatResult, GroqError> {
    let content = response
        .choices
        .into_iter()
        .find_map(|choice| choice.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or(GroqError::EmptyResponse)?;

    Ok(ChatResult {
        content,
        model: response
            .model
            .unwrap_or_else(|| requested_model.to_string()),
        usage: response.usage.unwrap_or_default(),
        duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_is_rejected_before_any_request() {
        let err = GroqClient::new(GroqConfig::new(" ")).err().unwrap();
        assert!(matches!(err, GroqError::MissingApiKey(_)));
    }

    #[test]
    fn test_into_result_takes_first_text_choice() {
        let body = r#"{
            "model": "llama-3.3-70b-versatile",
            "choices": [
                {"message": {"content": null}},
                {"message": {"content": "{\"kind\":\"FRQ\"}"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        let result = into_result(parsed, "fallback", Duration::from_millis(12)).unwrap();

        assert_eq!(result.content, "{\"kind\":\"FRQ\"}");
        assert_eq!(result.usage.total_tokens, 15);
        assert_eq!(result.duration_ms, 12);
    }

    #[test]
    fn test_into_result_rejects_blank_content() {
        let body = r#"{"choices": [{"message": {"content": "   "}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        let err = into_result(parsed, "m", Duration::ZERO).unwrap_err();
        assert!(matches!(err, GroqError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_transport_error() {
        // Port 9 (discard) on localhost is closed on any sane test machine.
        let config = GroqConfig::new("gsk_test")
            .with_base_url("http://127.0.0.1:9/v1")
            .with_request_timeout(Duration::from_secs(5));
        let client = GroqClient::new(config).unwrap();

        let err = client
            .chat(&[ChatMessage::user("ping")], &ChatOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, GroqError::Transport(_) | GroqError::Timeout(_)));
    }
}
