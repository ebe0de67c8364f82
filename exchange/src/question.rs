//! Question data model shared by the prompt builder, the validator, and graders.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which variant of question to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionKind {
    /// Multiple-choice question with four options.
    #[serde(rename = "MCQ")]
    MultipleChoice,
    /// Free-response question graded against an expected answer.
    #[serde(rename = "FRQ")]
    FreeResponse,
}

impl QuestionKind {
    /// Wire tag used in the `kind` field of a question payload.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::MultipleChoice => "MCQ",
            Self::FreeResponse => "FRQ",
        }
    }

    /// Human-readable name used in prompts.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple-choice question (MCQ)",
            Self::FreeResponse => "free-response question (FRQ)",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mcq" | "multiple-choice" | "multiple_choice" | "mc" => Ok(Self::MultipleChoice),
            "frq" | "free-response" | "free_response" | "fr" => Ok(Self::FreeResponse),
            other => Err(format!("unknown question kind '{other}' (expected MCQ or FRQ)")),
        }
    }
}

/// Label of one of the four multiple-choice options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChoiceLabel {
    /// First option.
    A,
    /// Second option.
    B,
    /// Third option.
    C,
    /// Fourth option.
    D,
}

impl ChoiceLabel {
    /// All labels in presentation order.
    pub const ALL: [Self; 4] = [Self::A, Self::B, Self::C, Self::D];

    /// Zero-based position of the option this label refers to.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
        }
    }

    /// Label for a zero-based option position.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::A),
            1 => Some(Self::B),
            2 => Some(Self::C),
            3 => Some(Self::D),
            _ => None,
        }
    }

    /// Parses a single letter, case-insensitively.
    #[must_use]
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter.trim() {
            "A" | "a" => Some(Self::A),
            "B" | "b" => Some(Self::B),
            "C" | "c" => Some(Self::C),
            "D" | "d" => Some(Self::D),
            _ => None,
        }
    }

    /// The uppercase letter.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }
}

impl fmt::Display for ChoiceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Requested difficulty of a generated question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Routine application of a single rule.
    Easy,
    /// Typical exam difficulty.
    Medium,
    /// Multi-step or conceptually demanding.
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        };
        f.write_str(s)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(format!("unknown difficulty '{other}' (expected easy, medium or hard)")),
        }
    }
}

/// A validated AP Calculus BC practice question.
///
/// Serialized as an internally tagged object: `{"kind": "MCQ", ...}` or
/// `{"kind": "FRQ", ...}`. Values of this type only come out of the
/// validator, so an MCQ always has four distinct, non-empty choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Question {
    /// Multiple-choice question.
    #[serde(rename = "MCQ")]
    MultipleChoice {
        /// Question stem.
        prompt: String,
        /// Option texts, labeled A-D in order.
        choices: [String; 4],
        /// Label of the correct option.
        correct_choice: ChoiceLabel,
        /// Worked reasoning for the correct option.
        explanation: String,
    },
    /// Free-response question.
    #[serde(rename = "FRQ")]
    FreeResponse {
        /// Question stem.
        prompt: String,
        /// Concise correct value or expression.
        expected_answer: String,
        /// Points a complete answer must address, in order.
        rubric_points: Vec<String>,
    },
}

impl Question {
    /// The variant tag of this question.
    #[must_use]
    pub const fn kind(&self) -> QuestionKind {
        match self {
            Self::MultipleChoice { .. } => QuestionKind::MultipleChoice,
            Self::FreeResponse { .. } => QuestionKind::FreeResponse,
        }
    }

    /// The question stem.
    #[must_use]
    pub fn prompt(&self) -> &str {
        match self {
            Self::MultipleChoice { prompt, .. } | Self::FreeResponse { prompt, .. } => prompt,
        }
    }

    /// Labeled options of a multiple-choice question (empty for FRQ).
    #[must_use]
    pub fn labeled_choices(&self) -> Vec<(ChoiceLabel, &str)> {
        match self {
            Self::MultipleChoice { choices, .. } => ChoiceLabel::ALL
                .iter()
                .zip(choices.iter())
                .map(|(label, text)| (*label, text.as_str()))
                .collect(),
            Self::FreeResponse { .. } => Vec::new(),
        }
    }

    /// The correct answer as shown to a learner (`"B. 3x^2"` or the expected answer).
    #[must_use]
    pub fn answer_display(&self) -> String {
        match self {
            Self::MultipleChoice {
                choices,
                correct_choice,
                ..
            } => format!("{correct_choice}. {}", choices[correct_choice.index()]),
            Self::FreeResponse {
                expected_answer, ..
            } => expected_answer.clone(),
        }
    }

    /// Randomly reorders the options of a multiple-choice question.
    ///
    /// `correct_choice` is remapped so it still refers to the same option
    /// text. Free-response questions are left unchanged.
    pub fn shuffle_choices<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if let Self::MultipleChoice {
            choices,
            correct_choice,
            ..
        } = self
        {
            let mut order = [0usize, 1, 2, 3];
            order.shuffle(rng);

            let original = choices.clone();
            for (slot, &from) in order.iter().enumerate() {
                choices[slot].clone_from(&original[from]);
            }

            let new_index = order
                .iter()
                .position(|&from| from == correct_choice.index())
                .unwrap_or_else(|| correct_choice.index());
            if let Some(label) = ChoiceLabel::from_index(new_index) {
                *correct_choice = label;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn sample_mcq() -> Question {
        Question::MultipleChoice {
            prompt: "What is d/dx of x^3?".to_string(),
            choices: [
                "3x^2".to_string(),
                "x^2".to_string(),
                "3x".to_string(),
                "x^4/4".to_string(),
            ],
            correct_choice: ChoiceLabel::A,
            explanation: "Power rule: bring down the exponent and subtract one.".to_string(),
        }
    }

    #[test]
    fn test_mcq_round_trips_through_tagged_json() {
        let value = serde_json::to_value(sample_mcq()).unwrap();
        assert_eq!(value["kind"], "MCQ");
        assert_eq!(value["correct_choice"], "A");
        assert_eq!(value["choices"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_frq_deserializes_from_tagged_json() {
        let q: Question = serde_json::from_value(json!({
            "kind": "FRQ",
            "prompt": "Find f'(x) for f(x) = x^3 + 2x.",
            "expected_answer": "3x^2 + 2",
            "rubric_points": ["Applies the power rule", "Differentiates 2x to 2"]
        }))
        .unwrap();

        assert_eq!(q.kind(), QuestionKind::FreeResponse);
        assert_eq!(q.answer_display(), "3x^2 + 2");
        assert!(q.labeled_choices().is_empty());
    }

    #[test]
    fn test_shuffle_keeps_the_correct_text() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let mut q = sample_mcq();
            q.shuffle_choices(&mut rng);

            let Question::MultipleChoice {
                choices,
                correct_choice,
                ..
            } = &q
            else {
                panic!("shuffle changed the variant");
            };
            assert_eq!(choices[correct_choice.index()], "3x^2");

            let mut sorted = choices.clone();
            sorted.sort();
            assert_eq!(sorted, ["3x", "3x^2", "x^2", "x^4/4"]);
        }
    }

    #[test]
    fn test_kind_and_difficulty_parse_loosely() {
        assert_eq!("mcq".parse::<QuestionKind>().unwrap(), QuestionKind::MultipleChoice);
        assert_eq!(" Free-Response ".parse::<QuestionKind>().unwrap(), QuestionKind::FreeResponse);
        assert!("essay".parse::<QuestionKind>().is_err());
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
    }

    #[test]
    fn test_labels_map_to_indices() {
        for (i, label) in ChoiceLabel::ALL.iter().enumerate() {
            assert_eq!(label.index(), i);
            assert_eq!(ChoiceLabel::from_index(i), Some(*label));
        }
        assert_eq!(ChoiceLabel::from_letter("c"), Some(ChoiceLabel::C));
        assert_eq!(ChoiceLabel::from_letter("E"), None);
    }
}
