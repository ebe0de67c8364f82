use std::time::Duration;
use thiserror::Error;

/// Errors returned by the Groq adapter.
#[derive(Debug, Error)]
pub enum GroqError {
    /// No usable API key was found.
    #[error("Groq API key missing: {0}")]
    MissingApiKey(String),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Connection, TLS, or other transport-level failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request did not complete within the configured bound.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The API answered with a non-success status.
    #[error("Groq API returned status {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The response contained no choice with text content.
    #[error("Response contained no completion text")]
    EmptyResponse,
}
