//! Configuration for the generation retry loop.

use std::time::Duration;

/// Configuration for generation retry behavior.
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    /// Maximum number of attempts before giving up (default: 3).
    pub max_attempts: usize,
    /// Upper bound on a single backend call (default: 30s).
    pub attempt_timeout: Duration,
    /// Whether to include the full schema in corrective feedback (default: true).
    pub include_schema_in_feedback: bool,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(30),
            include_schema_in_feedback: true,
        }
    }
}

impl ExchangeConfig {
    /// Set the maximum number of attempts.
    #[must_use]
    pub const fn with_max_attempts(mut self, max: usize) -> Self {
        self.max_attempts = max;
        self
    }

    /// Set the per-attempt timeout.
    #[must_use]
    pub const fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Set whether to include the schema in corrective feedback.
    #[must_use]
    pub const fn with_schema_in_feedback(mut self, include: bool) -> Self {
        self.include_schema_in_feedback = include;
        self
    }
}
