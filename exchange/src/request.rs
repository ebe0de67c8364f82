//! A single generation request.

use crate::question::{Difficulty, QuestionKind};

/// Parameters of one question generation.
///
/// `attempt` starts at 1 and is advanced by the exchange on each retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Variant to generate.
    pub kind: QuestionKind,
    /// Curriculum area constraint, e.g. the output of `Topic::describe`.
    pub topic: Option<String>,
    /// Requested difficulty, if any.
    pub difficulty: Option<Difficulty>,
    /// Whether a graphing calculator may be used, if specified.
    pub calculator_active: Option<bool>,
    /// Current attempt number, 1-based.
    pub attempt: usize,
}

impl GenerationRequest {
    /// Creates a request for `kind` with no further constraints.
    #[must_use]
    pub const fn new(kind: QuestionKind) -> Self {
        Self {
            kind,
            topic: None,
            difficulty: None,
            calculator_active: None,
            attempt: 1,
        }
    }

    /// Constrains the curriculum area.
    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Sets the requested difficulty.
    #[must_use]
    pub const fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Sets whether a calculator is allowed.
    #[must_use]
    pub const fn with_calculator(mut self, active: bool) -> Self {
        self.calculator_active = Some(active);
        self
    }
}
