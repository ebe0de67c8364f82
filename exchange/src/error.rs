//! Error types for generation exchanges with attempt history tracking.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::metrics::ExchangeMetrics;

/// Why a single attempt did not produce a question.
///
/// These are recovered locally by retrying; they only reach a caller inside
/// the history of a terminal [`GenerationError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    /// The response could not be parsed as JSON.
    MalformedJson {
        /// Parser message.
        message: String,
    },
    /// The response parsed but did not satisfy the question schema.
    SchemaViolation {
        /// Every validation problem found.
        errors: Vec<String>,
    },
    /// The backend did not answer within the attempt bound.
    Timeout(Duration),
}

impl AttemptFailure {
    /// Error lines describing this failure.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        match self {
            Self::MalformedJson { message } => vec![format!("JSON parse error: {message}")],
            Self::SchemaViolation { errors } => errors.clone(),
            Self::Timeout(limit) => vec![format!(
                "No response within {:.1}s",
                limit.as_secs_f64()
            )],
        }
    }
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedJson { message } => write!(f, "malformed JSON: {message}"),
            Self::SchemaViolation { errors } => {
                write!(f, "schema violation ({} errors)", errors.len())
            }
            Self::Timeout(limit) => write!(f, "timed out after {limit:?}"),
        }
    }
}

/// Record of a single failed attempt.
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    /// The attempt number (1-indexed).
    pub attempt_number: usize,
    /// What went wrong.
    pub failure: AttemptFailure,
    /// The parsed JSON, when parsing succeeded.
    pub submitted_json: Option<serde_json::Value>,
    /// Raw backend output (empty on timeout).
    pub raw_response: String,
    /// Elapsed time since the exchange started.
    pub elapsed: Duration,
}

/// Terminal errors of a generation exchange.
///
/// No partial question accompanies any of these.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The request itself is unusable; no backend call was made.
    #[error("Invalid generation request: {0}")]
    InvalidRequest(String),

    /// The final attempt timed out.
    #[error("Generation timed out after {attempts} attempts (limit {limit:?} per attempt)")]
    Timeout {
        /// Number of attempts made.
        attempts: usize,
        /// Per-attempt bound that was exceeded.
        limit: Duration,
        /// History of all attempts.
        history: Vec<AttemptRecord>,
        /// Metrics tracked across all attempts.
        metrics: ExchangeMetrics,
    },

    /// Every attempt produced an unusable response.
    #[error("Generation failed after {attempts} attempts: {}", .last_errors.join("; "))]
    ExhaustedRetries {
        /// Number of attempts made.
        attempts: usize,
        /// Validation errors from the final attempt.
        last_errors: Vec<String>,
        /// History of all attempts.
        history: Vec<AttemptRecord>,
        /// Metrics tracked across all attempts.
        metrics: ExchangeMetrics,
    },

    /// The backend could not be reached; not retried.
    #[error("Generation backend unavailable at attempt {attempt}: {message}")]
    BackendUnavailable {
        /// Transport or provider message.
        message: String,
        /// Attempt at which the failure occurred.
        attempt: usize,
    },

    /// The caller cancelled the exchange.
    #[error("Generation cancelled after {attempts} attempts")]
    Cancelled {
        /// Backend calls started before cancellation.
        attempts: usize,
    },
}

impl GenerationError {
    /// Text suitable for showing to a learner.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidRequest(reason) => format!("That request can't be used: {reason}"),
            Self::Timeout { .. } | Self::ExhaustedRetries { .. } | Self::BackendUnavailable { .. } => {
                "Sorry, I could not generate a question right now. Please try again.".to_string()
            }
            Self::Cancelled { .. } => "Question generation was cancelled.".to_string(),
        }
    }

    /// Attempt history, when the error carries one.
    #[must_use]
    pub fn history(&self) -> &[AttemptRecord] {
        match self {
            Self::Timeout { history, .. } | Self::ExhaustedRetries { history, .. } => history,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_retries_display_joins_last_errors() {
        let err = GenerationError::ExhaustedRetries {
            attempts: 2,
            last_errors: vec!["a".to_string(), "b".to_string()],
            history: Vec::new(),
            metrics: ExchangeMetrics::default(),
        };
        assert_eq!(err.to_string(), "Generation failed after 2 attempts: a; b");
        assert!(err.user_message().contains("try again"));
    }

    #[test]
    fn test_attempt_failure_errors_are_prefixed() {
        let failure = AttemptFailure::MalformedJson {
            message: "expected value at line 1 column 1".to_string(),
        };
        assert_eq!(
            failure.errors(),
            vec!["JSON parse error: expected value at line 1 column 1".to_string()]
        );
        assert_eq!(
            AttemptFailure::Timeout(Duration::from_secs(2)).errors(),
            vec!["No response within 2.0s".to_string()]
        );
    }
}
