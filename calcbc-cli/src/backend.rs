//! Builds the Groq-backed exchange and grader from command-line options.

use anyhow::{Context, Result};
use calcbc_exchange::backends::GroqBackend;
use calcbc_exchange::grading::{FreeResponseGrader, GRADING_PREAMBLE};
use calcbc_exchange::{ExchangeConfig, QuestionExchange};
use calcbc_groq::{ChatOptions, GroqClient, GroqConfig};
use std::time::Duration;

use crate::BackendArgs;

/// Grading wants near-deterministic answers.
const GRADING_TEMPERATURE: f32 = 0.1;

fn client(args: &BackendArgs) -> Result<GroqClient> {
    let mut config = GroqConfig::from_env().context("Groq is not configured")?;
    if let Some(model) = &args.model {
        config = config.with_model(model.clone());
    }
    GroqClient::new(config).context("Failed to create the Groq client")
}

/// Exchange that generates questions through Groq.
pub fn exchange(args: &BackendArgs) -> Result<QuestionExchange<GroqBackend>> {
    let client = client(args)?;
    tracing::info!(model = %client.config().model, "Using Groq");

    let config = ExchangeConfig::default()
        .with_max_attempts(args.max_attempts)
        .with_attempt_timeout(Duration::from_secs(args.timeout_secs));
    Ok(QuestionExchange::with_config(GroqBackend::new(client), config))
}

/// Free-response grader backed by Groq in free-text mode.
pub fn grader(args: &BackendArgs) -> Result<FreeResponseGrader<GroqBackend>> {
    let backend = GroqBackend::new(client(args)?)
        .with_system(GRADING_PREAMBLE)
        .with_options(ChatOptions::default().with_temperature(GRADING_TEMPERATURE));
    Ok(FreeResponseGrader::new(backend).with_timeout(Duration::from_secs(args.timeout_secs)))
}
