//! End-to-end tests against the live Groq API.
//!
//! These tests require a valid `GROQ_API_KEY` and network access. They are
//! marked `#[ignore]` to prevent CI failures in environments without one.
//!
//! ## Running E2E Tests
//!
//! ```bash
//! GROQ_API_KEY=gsk_... cargo test -p calcbc-groq -- --ignored
//! ```
//!
//! Note: responses are non-deterministic. The tests check the transport and
//! JSON mode, not specific model output.

use calcbc_groq::{ChatMessage, ChatOptions, GroqClient, GroqConfig, GroqError};

fn client_from_env() -> Option<GroqClient> {
    GroqClient::from_env().ok()
}

#[tokio::test]
#[ignore = "Requires GROQ_API_KEY and network access"]
async fn e2e_plain_text_completion() {
    let Some(client) = client_from_env() else {
        eprintln!("Skipping: GROQ_API_KEY not set");
        return;
    };

    let result = client
        .chat(
            &[ChatMessage::user("Reply with the single word: ok")],
            &ChatOptions::default().with_temperature(0.0),
        )
        .await
        .expect("chat call failed");

    assert!(!result.content.trim().is_empty());
    assert!(result.usage.total_tokens > 0);
}

#[tokio::test]
#[ignore = "Requires GROQ_API_KEY and network access"]
async fn e2e_json_mode_returns_parseable_object() {
    let Some(client) = client_from_env() else {
        eprintln!("Skipping: GROQ_API_KEY not set");
        return;
    };

    let messages = [
        ChatMessage::system("You reply with JSON objects only."),
        ChatMessage::user("Return a JSON object with a single field \"answer\" set to 4."),
    ];
    let result = client
        .chat(&messages, &ChatOptions::json())
        .await
        .expect("chat call failed");

    let value: serde_json::Value =
        serde_json::from_str(&result.content).expect("JSON mode returned non-JSON");
    assert!(value.is_object());
}

#[tokio::test]
#[ignore = "Requires network access"]
async fn e2e_invalid_key_is_reported_as_http_error() {
    let client = GroqClient::new(GroqConfig::new("gsk_definitely_not_valid")).unwrap();

    let err = client
        .chat(&[ChatMessage::user("ping")], &ChatOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, GroqError::Http { status: 401, .. }));
}
