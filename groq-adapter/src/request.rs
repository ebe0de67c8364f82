use serde::Serialize;

use crate::types::{ChatMessage, ChatOptions, GroqConfig, ResponseFormat};

/// JSON body of a `/chat/completions` request.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    /// Model identifier.
    pub model: &'a str,
    /// Conversation so far.
    pub messages: &'a [ChatMessage],
    /// Sampling temperature.
    pub temperature: f32,
    /// Completion token cap.
    pub max_tokens: u32,
    /// Output format constraint, omitted for plain text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormatBody>,
}

/// Wire form of a response format (`{"type": "json_object"}`).
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ResponseFormatBody {
    /// Format name.
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// Builds the request body, applying per-call overrides over the config.
#[must_use]
pub fn build_request<'a>(
    config: &'a GroqConfig,
    messages: &'a [ChatMessage],
    options: &ChatOptions,
) -> ChatCompletionRequest<'a> {
    let response_format = match options.response_format {
        ResponseFormat::Text => None,
        ResponseFormat::JsonObject => Some(ResponseFormatBody {
            kind: "json_object",
        }),
    };

    ChatCompletionRequest {
        model: &config.model,
        messages,
        temperature: options.temperature.unwrap_or(config.temperature),
        max_tokens: options.max_tokens.unwrap_or(config.max_tokens),
        response_format,
    }
}

/// Pulls a readable message out of an error body (`{"error": {"message": ...}}`).
///
/// Falls back to the first 200 characters of the raw body.
#[must_use]
pub fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(200).collect())
}
