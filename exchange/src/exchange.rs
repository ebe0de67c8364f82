//! The schema-validated generation exchange with retry-on-malformed-output.

use serde_json::Value;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::backend::{BackendError, GenerationBackend};
use crate::config::ExchangeConfig;
use crate::error::{AttemptFailure, AttemptRecord, GenerationError};
use crate::metrics::{estimate_tokens, ExchangeMetrics};
use crate::prompt::{
    build_generation_prompt, build_parse_error_feedback, build_timeout_feedback,
    build_validation_feedback,
};
use crate::question::{Question, QuestionKind};
use crate::request::GenerationRequest;
use crate::schema::schema_for;
use crate::validate::{into_question, parse_response};

/// A validated question plus what it cost to obtain.
#[derive(Debug, Clone)]
pub struct Generated {
    /// The question.
    pub question: Question,
    /// Attempts, time and estimated tokens spent.
    pub metrics: ExchangeMetrics,
}

/// Generates questions through a backend, validating every response and
/// retrying with corrective feedback until a valid question arrives or the
/// attempt budget runs out.
///
/// Holds no per-request state, so one exchange can serve concurrent callers.
pub struct QuestionExchange<B> {
    backend: B,
    config: ExchangeConfig,
}

/// Estimated tokens sent and received across attempts.
#[derive(Default)]
struct Usage {
    input_tokens: usize,
    output_tokens: usize,
}

impl Usage {
    fn metrics(&self, attempts: usize, start: Instant) -> ExchangeMetrics {
        ExchangeMetrics {
            total_attempts: attempts,
            wall_time: start.elapsed(),
            estimated_input_tokens: self.input_tokens,
            estimated_output_tokens: self.output_tokens,
        }
    }
}

impl<B: GenerationBackend> QuestionExchange<B> {
    /// Creates an exchange with the default configuration.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            config: ExchangeConfig::default(),
        }
    }

    /// Creates an exchange with an explicit configuration.
    pub fn with_config(backend: B, config: ExchangeConfig) -> Self {
        Self { backend, config }
    }

    /// The configuration used by [`Self::generate_request`].
    pub const fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// The wrapped backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Generates one question of `kind`, optionally constrained to `topic`.
    ///
    /// `max_attempts` overrides the configured attempt budget; the remaining
    /// configuration (timeout, feedback) is taken from the exchange.
    ///
    /// # Errors
    ///
    /// See [`Self::generate_request`].
    pub async fn generate(
        &self,
        kind: QuestionKind,
        topic: Option<&str>,
        max_attempts: usize,
    ) -> Result<Question, GenerationError> {
        let mut request = GenerationRequest::new(kind);
        if let Some(topic) = topic {
            request = request.with_topic(topic);
        }
        let config = self.config.clone().with_max_attempts(max_attempts);

        self.run(request, &config, &CancellationToken::new())
            .await
            .map(|generated| generated.question)
    }

    /// Runs the full exchange for `request` until it yields a question, fails
    /// terminally, or `cancel` fires.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` when the attempt budget is zero (no backend call).
    /// - `BackendUnavailable` on the first transport failure (not retried).
    /// - `Timeout` when the final attempt timed out.
    /// - `ExhaustedRetries` when the final attempt returned an unusable payload.
    /// - `Cancelled` when `cancel` fires; no further call is issued.
    pub async fn generate_request(
        &self,
        request: GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<Generated, GenerationError> {
        self.run(request, &self.config, cancel).await
    }

    async fn run(
        &self,
        mut request: GenerationRequest,
        config: &ExchangeConfig,
        cancel: &CancellationToken,
    ) -> Result<Generated, GenerationError> {
        let max_attempts = config.max_attempts;
        if max_attempts == 0 {
            return Err(GenerationError::InvalidRequest(
                "max_attempts must be at least 1".to_string(),
            ));
        }

        let kind = request.kind;
        let start = Instant::now();
        let schema = schema_for(kind);
        let feedback_schema = config.include_schema_in_feedback.then_some(&schema);
        let mut usage = Usage::default();
        let mut history: Vec<AttemptRecord> = Vec::new();
        let mut current_prompt = build_generation_prompt(&request);

        for attempt in 1..=max_attempts {
            request.attempt = attempt;

            if cancel.is_cancelled() {
                tracing::info!(attempt, "Generation cancelled before backend call");
                return Err(GenerationError::Cancelled {
                    attempts: attempt - 1,
                });
            }

            usage.input_tokens += estimate_tokens(&current_prompt);
            tracing::debug!(
                kind = %kind,
                attempt = request.attempt,
                max_attempts,
                prompt = %current_prompt,
                "Sending generation prompt"
            );

            let outcome = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::info!(attempt, "Generation cancelled during backend call");
                    return Err(GenerationError::Cancelled { attempts: attempt });
                }
                result = tokio::time::timeout(
                    config.attempt_timeout,
                    self.backend.complete(&current_prompt),
                ) => result,
            };

            let (failure, submitted_json, raw_response) = match outcome {
                Err(_) => (AttemptFailure::Timeout(config.attempt_timeout), None, String::new()),
                Ok(Err(BackendError::Timeout(limit))) => {
                    (AttemptFailure::Timeout(limit), None, String::new())
                }
                Ok(Err(BackendError::Unavailable(message))) => {
                    tracing::error!(attempt, error = %message, "Generation backend unavailable");
                    return Err(GenerationError::BackendUnavailable { message, attempt });
                }
                Ok(Ok(raw)) => {
                    usage.output_tokens += estimate_tokens(&raw);
                    tracing::debug!(attempt, response = %raw, "Received backend response");

                    match check_response(kind, &raw) {
                        Ok(question) => {
                            let metrics = usage.metrics(attempt, start);
                            tracing::info!(
                                kind = %kind,
                                attempts = attempt,
                                wall_time_ms = u64::try_from(metrics.wall_time.as_millis()).unwrap_or(u64::MAX),
                                "Generated question"
                            );
                            return Ok(Generated { question, metrics });
                        }
                        Err((failure, value)) => (failure, value, raw),
                    }
                }
            };

            tracing::warn!(
                kind = %kind,
                attempt,
                max_attempts,
                failure = %failure,
                "Generation attempt failed"
            );

            if attempt < max_attempts {
                let feedback = match &failure {
                    AttemptFailure::MalformedJson { message } => build_parse_error_feedback(
                        &raw_response,
                        message,
                        attempt,
                        max_attempts,
                        feedback_schema,
                    ),
                    AttemptFailure::SchemaViolation { errors } => build_validation_feedback(
                        feedback_schema,
                        submitted_json.as_ref().unwrap_or(&Value::Null),
                        errors,
                        attempt,
                        max_attempts,
                    ),
                    AttemptFailure::Timeout(limit) => {
                        build_timeout_feedback(*limit, attempt, max_attempts)
                    }
                };
                // Conversation continuation: the model sees every earlier correction.
                current_prompt = format!("{current_prompt}\n\n{feedback}");
            }

            history.push(AttemptRecord {
                attempt_number: attempt,
                failure,
                submitted_json,
                raw_response,
                elapsed: start.elapsed(),
            });
        }

        let metrics = usage.metrics(max_attempts, start);
        let last_failure = history.last().map(|record| record.failure.clone());

        let err = match last_failure {
            Some(AttemptFailure::Timeout(limit)) => GenerationError::Timeout {
                attempts: max_attempts,
                limit,
                history,
                metrics,
            },
            other => GenerationError::ExhaustedRetries {
                attempts: max_attempts,
                last_errors: other.map(|f| f.errors()).unwrap_or_default(),
                history,
                metrics,
            },
        };
        tracing::error!(kind = %kind, error = %err, "Question generation failed");
        Err(err)
    }
}

/// Parses and validates one raw response.
fn check_response(
    kind: QuestionKind,
    raw: &str,
) -> Result<Question, (AttemptFailure, Option<Value>)> {
    let value = parse_response(raw)
        .map_err(|message| (AttemptFailure::MalformedJson { message }, None))?;

    into_question(kind, value.clone()).map_err(|result| {
        (
            AttemptFailure::SchemaViolation {
                errors: result.errors,
            },
            Some(value),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::example_for;

    #[test]
    fn test_check_response_classifies_failures() {
        let (failure, value) = check_response(QuestionKind::FreeResponse, "not json").unwrap_err();
        assert!(matches!(failure, AttemptFailure::MalformedJson { .. }));
        assert!(value.is_none());

        let (failure, value) =
            check_response(QuestionKind::FreeResponse, r#"{"kind": "FRQ"}"#).unwrap_err();
        assert!(matches!(failure, AttemptFailure::SchemaViolation { ref errors } if errors.len() >= 3));
        assert!(value.is_some());

        let raw = example_for(QuestionKind::FreeResponse).to_string();
        let question = check_response(QuestionKind::FreeResponse, &raw).unwrap();
        assert_eq!(question.kind(), QuestionKind::FreeResponse);
    }
}
