//! Groq chat-completions bridge.

use async_trait::async_trait;
use calcbc_groq::{ChatMessage, ChatOptions, GroqClient, GroqError};

use crate::backend::{BackendError, GenerationBackend};
use crate::prompt::SYSTEM_PREAMBLE;

/// Backend that sends each prompt to Groq in JSON mode.
#[derive(Debug, Clone)]
pub struct GroqBackend {
    client: GroqClient,
    system: String,
    options: ChatOptions,
}

impl GroqBackend {
    /// Wraps a client, using the question-generation system message and
    /// the client's configured temperature.
    #[must_use]
    pub fn new(client: GroqClient) -> Self {
        let options = ChatOptions::json().with_temperature(client.config().temperature);
        Self {
            client,
            system: SYSTEM_PREAMBLE.to_string(),
            options,
        }
    }

    /// Replaces the system message.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = system.into();
        self
    }

    /// Replaces the per-call options, e.g. to drop JSON mode for free-text grading.
    #[must_use]
    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    /// The wrapped client.
    #[must_use]
    pub const fn client(&self) -> &GroqClient {
        &self.client
    }
}

impl From<GroqError> for BackendError {
    fn from(err: GroqError) -> Self {
        match err {
            GroqError::Timeout(limit) => Self::Timeout(limit),
            other => Self::Unavailable(other.to_string()),
        }
    }
}

#[async_trait]
impl GenerationBackend for GroqBackend {
    async fn complete(&self, prompt: &str) -> Result<String, BackendError> {
        let messages = [ChatMessage::system(&self.system), ChatMessage::user(prompt)];
        let result = self.client.chat(&messages, &self.options).await?;

        tracing::debug!(
            model = %result.model,
            duration_ms = result.duration_ms,
            total_tokens = result.usage.total_tokens,
            "Groq completion received"
        );

        Ok(result.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calcbc_groq::GroqConfig;
    use std::time::Duration;

    #[test]
    fn test_groq_timeouts_stay_timeouts() {
        let err: BackendError = GroqError::Timeout(Duration::from_secs(60)).into();
        assert_eq!(err, BackendError::Timeout(Duration::from_secs(60)));

        let err: BackendError = GroqError::Http {
            status: 503,
            message: "over capacity".to_string(),
        }
        .into();
        assert!(matches!(err, BackendError::Unavailable(m) if m.contains("503")));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_unavailable() {
        let config = GroqConfig::new("test-key")
            .with_base_url("http://127.0.0.1:9")
            .with_request_timeout(Duration::from_secs(2));
        let backend = GroqBackend::new(GroqClient::new(config).unwrap());

        let err = backend.complete("hello").await.unwrap_err();
        assert!(matches!(err, BackendError::Unavailable(_) | BackendError::Timeout(_)));
    }
}
