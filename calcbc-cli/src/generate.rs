//! `calcbc generate`.

use anyhow::{bail, Context, Result};
use calcbc_exchange::curriculum::{self, Topic};
use calcbc_exchange::{GenerationError, GenerationRequest};
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::{backend, render, GenerateArgs};

/// At most this many generations run at once.
pub const MAX_IN_FLIGHT: usize = 4;

/// Resolves the topic text for each of `count` questions.
fn topics(args: &GenerateArgs) -> Result<Vec<Option<String>>> {
    if let Some(topic) = &args.topic {
        return Ok(vec![Some(topic.clone()); args.count]);
    }
    if let Some(id) = &args.skill {
        let (unit, skill) = curriculum::skill_by_id(id)?;
        return Ok(vec![Some(Topic::Skill(unit, skill).describe()); args.count]);
    }
    if let Some(number) = args.unit {
        let unit = curriculum::unit(number)?;
        let mut rng = rand::thread_rng();
        return Ok((0..args.count)
            .map(|_| Topic::random_skill(&[unit], &mut rng).map(|t| t.describe()))
            .collect());
    }
    Ok(vec![None; args.count])
}

pub async fn run(args: GenerateArgs, cancel: &CancellationToken) -> Result<()> {
    if args.count == 0 {
        bail!("--count must be at least 1");
    }
    let topics = topics(&args)?;
    let exchange = backend::exchange(&args.backend)?;

    let requests = topics.into_iter().map(|topic| {
        let mut request = GenerationRequest::new(args.kind).with_calculator(args.calculator);
        if let Some(difficulty) = args.difficulty {
            request = request.with_difficulty(difficulty);
        }
        if let Some(topic) = topic {
            request = request.with_topic(topic);
        }
        request
    });

    let results: Vec<_> = stream::iter(requests)
        .map(|request| {
            let exchange = &exchange;
            async move {
                let topic = request.topic.clone();
                (topic, exchange.generate_request(request, cancel).await)
            }
        })
        .buffer_unordered(MAX_IN_FLIGHT)
        .collect()
        .await;

    let mut failures = 0usize;
    for (topic, result) in results {
        match result {
            Ok(generated) => {
                let record =
                    render::generated_record(&generated.question, topic.as_deref(), &generated.metrics);
                println!(
                    "{}",
                    serde_json::to_string_pretty(&record).context("Failed to serialize question")?
                );
            }
            Err(GenerationError::Cancelled { .. }) => failures += 1,
            Err(e) => {
                eprintln!("{}", e.user_message());
                tracing::debug!(history = ?e.history(), "Attempt history");
                failures += 1;
            }
        }
    }

    if cancel.is_cancelled() {
        bail!("Generation cancelled");
    }
    if failures > 0 {
        bail!("{failures} of {} questions could not be generated", args.count);
    }
    Ok(())
}
