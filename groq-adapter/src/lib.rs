//! Rust adapter for the Groq chat-completions API.
//!
//! This crate provides API key resolution, request construction, and a
//! small HTTPS client for Groq's OpenAI-compatible `/chat/completions`
//! endpoint. It knows nothing about what the prompts are for; callers get
//! the first completion's text back.

/// API key and endpoint resolution from explicit values and the environment.
pub mod discovery;
/// Error types returned by adapter operations.
pub mod error;
/// Request body construction for chat-completion calls.
pub mod request;
/// Shared data types for configuration, messages, and results.
pub mod types;

mod client;

pub use client::GroqClient;
pub use discovery::{resolve_api_key, API_KEY_ENV_VAR, BASE_URL_ENV_VAR, MODEL_ENV_VAR};
pub use error::GroqError;
pub use types::*;
