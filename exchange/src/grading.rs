//! Checking learner answers against generated questions.

use std::time::Duration;

use crate::backend::{BackendError, GenerationBackend};
use crate::question::{ChoiceLabel, Question};

/// System message for a free-text grading backend.
pub const GRADING_PREAMBLE: &str = "You are a helpful AI assistant that grades free response answers. \
     Your response must strictly follow the format: 'Correct!' or 'Incorrect.' followed by a descriptive feedback message.";

/// Outcome of grading one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Whether the answer counts as correct.
    pub correct: bool,
    /// Text shown to the learner.
    pub feedback: String,
}

impl Verdict {
    fn correct(feedback: impl Into<String>) -> Self {
        Self {
            correct: true,
            feedback: feedback.into(),
        }
    }

    fn incorrect(feedback: impl Into<String>) -> Self {
        Self {
            correct: false,
            feedback: feedback.into(),
        }
    }
}

/// Grades an answer without a backend.
///
/// Multiple-choice answers always get a verdict. Free-response answers only
/// get one when they match the expected answer after normalisation; `None`
/// means a backend has to decide.
#[must_use]
pub fn grade_locally(question: &Question, answer: &str) -> Option<Verdict> {
    match question {
        Question::MultipleChoice {
            choices,
            correct_choice,
            ..
        } => Some(grade_choice(choices, *correct_choice, answer)),
        Question::FreeResponse {
            expected_answer, ..
        } => (normalize_free_text(answer) == normalize_free_text(expected_answer)
            && !answer.trim().is_empty())
        .then(|| Verdict::correct(format!("Correct! The answer is {}.", expected_answer.trim()))),
    }
}

/// Matches a multiple-choice answer by label (`b`, `B.`, `(c)`) or by option text.
#[must_use]
pub fn grade_choice(choices: &[String; 4], correct: ChoiceLabel, answer: &str) -> Verdict {
    let correct_display = format!("{correct}. {}", choices[correct.index()]);

    let picked = parse_label(answer).or_else(|| match_choice_text(choices, answer));

    match picked {
        Some(label) if label == correct => {
            Verdict::correct(format!("Correct! The answer is {correct_display}."))
        }
        Some(_) => Verdict::incorrect(format!(
            "Incorrect. The correct answer is {correct_display}."
        )),
        None => Verdict::incorrect(
            "Incorrect. Please choose one of the options (A, B, C or D) or type the full option text.",
        ),
    }
}

/// Exact text first; a case-insensitive match counts only when it is unique.
fn match_choice_text(choices: &[String; 4], answer: &str) -> Option<ChoiceLabel> {
    let answer = answer.trim();
    if let Some(index) = choices.iter().position(|c| c.trim() == answer) {
        return ChoiceLabel::from_index(index);
    }
    let mut folded = choices
        .iter()
        .enumerate()
        .filter(|(_, c)| c.trim().to_lowercase() == answer.to_lowercase());
    match (folded.next(), folded.next()) {
        (Some((index, _)), None) => ChoiceLabel::from_index(index),
        _ => None,
    }
}

fn parse_label(answer: &str) -> Option<ChoiceLabel> {
    let cleaned: String = answer
        .trim()
        .chars()
        .filter(|c| !matches!(c, '.' | ')' | '('))
        .collect();
    ChoiceLabel::from_letter(&cleaned)
}

fn normalize_free_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Removes `<think>...</think>` blocks some models emit before their answer.
///
/// An unterminated block swallows the rest of the text.
#[must_use]
pub fn strip_think_blocks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find("<think>") {
        out.push_str(&rest[..open]);
        match rest[open..].find("</think>") {
            Some(close) => rest = &rest[open + close + "</think>".len()..],
            None => rest = "",
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

/// Interprets a grading backend's reply.
///
/// The reply must start with `Correct!` or `Incorrect.` (case-insensitive);
/// anything else counts as incorrect.
#[must_use]
pub fn parse_grading_response(raw: &str) -> Verdict {
    let feedback = strip_think_blocks(raw);
    let lower = feedback.to_lowercase();

    if lower.starts_with("correct!") {
        Verdict::correct(feedback)
    } else if lower.starts_with("incorrect.") || lower.starts_with("incorrect!") {
        Verdict::incorrect(feedback)
    } else {
        Verdict::incorrect(format!(
            "Incorrect. The grader's response could not be interpreted: \"{feedback}\""
        ))
    }
}

/// Grades free-response answers with a backend, falling back to local
/// matching where it is decisive.
pub struct FreeResponseGrader<B> {
    backend: B,
    timeout: Duration,
}

impl<B: GenerationBackend> FreeResponseGrader<B> {
    /// Creates a grader with a 30 second bound on each grading call.
    pub const fn new(backend: B) -> Self {
        Self {
            backend,
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the bound on each grading call.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Grades `answer` to `question`.
    ///
    /// Multiple-choice questions and exact free-response matches never reach
    /// the backend.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the backend fails or exceeds the bound.
    pub async fn grade(&self, question: &Question, answer: &str) -> Result<Verdict, BackendError> {
        if let Some(verdict) = grade_locally(question, answer) {
            return Ok(verdict);
        }

        let prompt = build_grading_prompt(question, answer);
        let raw = tokio::time::timeout(self.timeout, self.backend.complete(&prompt))
            .await
            .map_err(|_| BackendError::Timeout(self.timeout))??;

        tracing::debug!(response = %raw, "Received grading response");
        Ok(parse_grading_response(&raw))
    }
}

/// Builds the prompt asking a backend to grade a free-response answer.
#[must_use]
pub fn build_grading_prompt(question: &Question, answer: &str) -> String {
    let (expected, rubric) = match question {
        Question::MultipleChoice {
            explanation, ..
        } => (question.answer_display(), explanation.clone()),
        Question::FreeResponse {
            expected_answer,
            rubric_points,
            ..
        } => (
            expected_answer.clone(),
            rubric_points
                .iter()
                .map(|p| format!("- {p}"))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
    };

    format!(
        "You are an expert, precise, and objective grader for AP Calculus BC.\n\
         Grade the user's free response answer.\n\n\
         Question: {question}\n\
         Official Correct Answer: {expected}\n\
         Official Rubric:\n{rubric}\n\
         ---\n\
         User's Submitted Answer: {answer}\n\n\
         Your response MUST start with either \"Correct!\" or \"Incorrect.\" followed by a space. \
         Do not include internal reasoning or <think> blocks. Be concise.\n\
         - If the answer is substantially correct, begin with \"Correct!\" and briefly confirm a key strength.\n\
         - Otherwise begin with \"Incorrect.\" and identify what was missed, with a hint for improvement.\n\n\
         Examples:\n\
         Correct! Your solution applies the fundamental theorem of calculus to find the area.\n\
         Incorrect. Remember to apply the chain rule when differentiating the inner function.",
        question = question.prompt(),
        answer = answer.trim(),
    )
}
