//! `calcbc`: generate AP Calculus BC practice questions and take quizzes in the terminal.

mod backend;
mod generate;
mod quiz;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use calcbc_exchange::{Difficulty, QuestionKind};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log prompts and raw model responses
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate questions and print them as JSON
    Generate(GenerateArgs),
    /// List curriculum units and skills
    Units,
    /// Take a quiz on one unit or a range of units
    Quiz(QuizArgs),
}

/// Backend options shared by `generate` and `quiz`.
#[derive(clap::Args, Clone)]
struct BackendArgs {
    /// Groq model (defaults to GROQ_MODEL or llama-3.3-70b-versatile)
    #[arg(long)]
    model: Option<String>,

    /// Attempts per question before giving up
    #[arg(long, default_value_t = 3)]
    max_attempts: usize,

    /// Seconds to wait for each model response
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Question kind: mcq or frq
    #[arg(long, default_value = "mcq")]
    kind: QuestionKind,

    /// Draw a random skill from this unit
    #[arg(long, conflicts_with = "skill")]
    unit: Option<u8>,

    /// Target one skill, e.g. 3.1
    #[arg(long)]
    skill: Option<String>,

    /// Free-text topic, overrides --unit and --skill
    #[arg(long)]
    topic: Option<String>,

    /// easy, medium or hard
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// Allow a graphing calculator
    #[arg(long)]
    calculator: bool,

    /// How many questions to generate
    #[arg(long, default_value_t = 1)]
    count: usize,

    #[command(flatten)]
    backend: BackendArgs,
}

/// Which kinds a quiz draws from.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum QuizKind {
    Mcq,
    Frq,
    Mixed,
}

#[derive(clap::Args)]
struct QuizArgs {
    /// Unit number or ascending range, e.g. 4 or 1-3
    units: String,

    /// Number of questions (1-30)
    #[arg(long, default_value_t = calcbc_exchange::session::DEFAULT_QUESTION_COUNT)]
    count: usize,

    /// mcq, frq or mixed
    #[arg(long, value_enum, default_value_t = QuizKind::Mcq)]
    kind: QuizKind,

    #[command(flatten)]
    backend: BackendArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling");
            on_interrupt.cancel();
        }
    });

    match cli.command {
        Commands::Generate(args) => generate::run(args, &cancel).await,
        Commands::Units => {
            print!("{}", render::units());
            Ok(())
        }
        Commands::Quiz(args) => quiz::run(args, &cancel).await,
    }
}
