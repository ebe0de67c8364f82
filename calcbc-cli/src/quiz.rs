//! `calcbc quiz`: an interactive quiz on stdin/stdout.

use anyhow::{bail, Context, Result};
use calcbc_exchange::curriculum::{self, Topic, Unit};
use calcbc_exchange::session::{self, QuizSession, SESSION_TIMEOUT};
use calcbc_exchange::{GenerationError, GenerationRequest, Question, QuestionKind};
use futures::stream::{self, StreamExt};
use rand::Rng;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use crate::generate::MAX_IN_FLIGHT;
use crate::{backend, render, QuizArgs, QuizKind};

fn plan_requests(units: &[&'static Unit], count: usize, kind: QuizKind) -> Vec<GenerationRequest> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let kind = match kind {
                QuizKind::Mcq => QuestionKind::MultipleChoice,
                QuizKind::Frq => QuestionKind::FreeResponse,
                QuizKind::Mixed if rng.gen_bool(0.5) => QuestionKind::MultipleChoice,
                QuizKind::Mixed => QuestionKind::FreeResponse,
            };
            let request = GenerationRequest::new(kind);
            match Topic::random_skill(units, &mut rng) {
                Some(topic) => request.with_topic(topic.describe()),
                None => request,
            }
        })
        .collect()
}

fn describe_selection(units: &[&'static Unit]) -> String {
    match units {
        [only] => format!("Unit {}: {}", only.number, only.name),
        [first, .., last] => format!("Units {}-{}", first.number, last.number),
        [] => String::new(),
    }
}

fn prompt_user(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{text}")?;
    stdout.flush().context("Failed to flush stdout")
}

pub async fn run(args: QuizArgs, cancel: &CancellationToken) -> Result<()> {
    let units = curriculum::parse_unit_selection(&args.units)?;
    let count = session::check_question_count(args.count)?;
    let exchange = backend::exchange(&args.backend)?;
    let grader = backend::grader(&args.backend)?;

    println!(
        "Starting a {count}-question quiz on {}. Generating questions...",
        describe_selection(&units)
    );

    let results: Vec<Result<Question, GenerationError>> =
        stream::iter(plan_requests(&units, count, args.kind))
            .map(|request| {
                let exchange = &exchange;
                async move {
                    exchange
                        .generate_request(request, cancel)
                        .await
                        .map(|generated| generated.question)
                }
            })
            .buffered(MAX_IN_FLIGHT)
            .collect()
            .await;

    if cancel.is_cancelled() {
        bail!("Quiz cancelled");
    }

    let mut questions = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(question) => questions.push(question),
            Err(e) => tracing::warn!(error = %e, "Skipping a question that could not be generated"),
        }
    }
    if questions.is_empty() {
        bail!("Sorry, I could not generate any questions right now. Please try again.");
    }
    if questions.len() < count {
        println!("Only {} of {count} questions could be generated.", questions.len());
    }

    {
        let mut rng = rand::thread_rng();
        for question in &mut questions {
            question.shuffle_choices(&mut rng);
        }
    }

    let mut session = QuizSession::new(questions)?;
    ask_all(&mut session, &grader, cancel).await?;

    println!(
        "\nQuiz finished in {}s! {}",
        session.elapsed().as_secs(),
        session.summary()
    );
    Ok(())
}

async fn ask_all<B: calcbc_exchange::GenerationBackend>(
    session: &mut QuizSession,
    grader: &calcbc_exchange::grading::FreeResponseGrader<B>,
    cancel: &CancellationToken,
) -> Result<()> {
    let total = session.len();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(question) = session.next_question().cloned() {
        prompt_user(&render::quiz_question(session.asked() + 1, total, &question))?;

        let line = tokio::select! {
            () = cancel.cancelled() => {
                println!("\nQuiz cancelled.");
                return Ok(());
            }
            read = tokio::time::timeout_at(
                session.idle_deadline(SESSION_TIMEOUT),
                lines.next_line(),
            ) => match read {
                Err(_) => {
                    println!(
                        "\nThe quiz ended after {} minutes without an answer.",
                        SESSION_TIMEOUT.as_secs() / 60
                    );
                    return Ok(());
                }
                Ok(line) => line.context("Failed to read answer")?,
            },
        };

        // End of input.
        let Some(line) = line else {
            return Ok(());
        };
        let answer = line.trim();
        if answer.is_empty() {
            continue;
        }
        if answer.eq_ignore_ascii_case("stop") {
            println!("Quiz stopped.");
            return Ok(());
        }

        let graded = tokio::select! {
            () = cancel.cancelled() => {
                println!("\nQuiz cancelled.");
                return Ok(());
            }
            graded = grader.grade(&question, answer) => graded,
        };
        let verdict = match graded {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::warn!(error = %e, "Grading failed");
                println!("Sorry, I could not grade that answer right now. Please try again.");
                continue;
            }
        };

        println!("{}", verdict.feedback);
        if !verdict.correct {
            println!("{}", render::solution(&question));
        }
        session.record(&verdict);
    }

    Ok(())
}
