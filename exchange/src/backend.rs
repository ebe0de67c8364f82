//! The seam between the exchange and whatever produces completions.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Failures a backend reports for a single call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// Network, transport, or provider failure. Not retried by the exchange.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The backend gave up waiting on its own upstream.
    #[error("backend timed out after {0:?}")]
    Timeout(Duration),
}

/// A text-completion backend: prompt in, one completion out.
///
/// Implementations must be safe to share across concurrent exchanges.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Sends `prompt` and returns the raw completion text.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when no completion could be obtained.
    async fn complete(&self, prompt: &str) -> Result<String, BackendError>;
}

#[async_trait]
impl<B: GenerationBackend + ?Sized> GenerationBackend for Arc<B> {
    async fn complete(&self, prompt: &str) -> Result<String, BackendError> {
        (**self).complete(prompt).await
    }
}

#[async_trait]
impl<B: GenerationBackend + ?Sized> GenerationBackend for &B {
    async fn complete(&self, prompt: &str) -> Result<String, BackendError> {
        (**self).complete(prompt).await
    }
}
