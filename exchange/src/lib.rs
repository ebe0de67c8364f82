//! Schema-validated AP Calculus BC question generation.
//!
//! A [`QuestionExchange`] asks a [`GenerationBackend`] for a question, parses
//! and validates the reply against the question schema, and retries with
//! corrective feedback until a valid [`Question`] arrives or the attempt
//! budget runs out:
//!
//! - [`exchange`] - the retry loop
//! - [`validate`] / [`schema`] - parsing and structural checks
//! - [`prompt`] - generation prompt and corrective feedback
//! - [`backends`] - Groq and `rig` bridges
//! - [`curriculum`], [`grading`], [`session`] - the quiz surface around it

pub mod backend;
pub mod backends;
pub mod config;
pub mod curriculum;
pub mod error;
pub mod exchange;
pub mod grading;
pub mod metrics;
pub mod prompt;
pub mod question;
pub mod request;
pub mod schema;
pub mod session;
pub mod validate;

pub use backend::{BackendError, GenerationBackend};
pub use config::ExchangeConfig;
pub use error::{AttemptFailure, AttemptRecord, GenerationError};
pub use exchange::{Generated, QuestionExchange};
pub use metrics::{estimate_tokens, ExchangeMetrics};
pub use question::{ChoiceLabel, Difficulty, Question, QuestionKind};
pub use request::GenerationRequest;
pub use validate::ValidationResult;

/// Common traits and types for ergonomic usage of the exchange.
pub mod prelude {
    pub use crate::backend::{BackendError, GenerationBackend};
    pub use crate::config::ExchangeConfig;
    pub use crate::curriculum::{parse_unit_selection, Topic, UNITS};
    pub use crate::error::GenerationError;
    pub use crate::exchange::{Generated, QuestionExchange};
    pub use crate::grading::{grade_locally, FreeResponseGrader, Verdict};
    pub use crate::question::{ChoiceLabel, Difficulty, Question, QuestionKind};
    pub use crate::request::GenerationRequest;
    pub use crate::session::QuizSession;
    pub use tokio_util::sync::CancellationToken;
}
