//! Plain-text rendering for the terminal.

use calcbc_exchange::curriculum::UNITS;
use calcbc_exchange::{ExchangeMetrics, Question};
use serde_json::{json, Value};
use std::fmt::Write;
use uuid::Uuid;

/// The curriculum listing printed by `calcbc units`.
pub fn units() -> String {
    let mut out = String::new();
    for unit in UNITS {
        let _ = writeln!(out, "Unit {}: {}", unit.number, unit.name);
        for skill in unit.skills {
            let _ = writeln!(out, "  {:<5} {}", skill.id, skill.name);
        }
    }
    out
}

/// JSON record printed by `calcbc generate`.
pub fn generated_record(question: &Question, topic: Option<&str>, metrics: &ExchangeMetrics) -> Value {
    json!({
        "id": Uuid::new_v4().to_string(),
        "topic": topic,
        "attempts": metrics.total_attempts,
        "wall_time_ms": u64::try_from(metrics.wall_time.as_millis()).unwrap_or(u64::MAX),
        "question": question,
    })
}

/// A question as shown during a quiz.
pub fn quiz_question(number: usize, total: usize, question: &Question) -> String {
    let mut out = format!(
        "\nQuestion {number}/{total} ({})\n{}\n",
        question.kind(),
        question.prompt()
    );
    for (label, text) in question.labeled_choices() {
        let _ = writeln!(out, "  {label}. {text}");
    }
    out.push_str(match question {
        Question::MultipleChoice { .. } => "Answer with A, B, C or D (or `stop` to end the quiz): ",
        Question::FreeResponse { .. } => "Type your answer (or `stop` to end the quiz): ",
    });
    out
}

/// What to show after an answer was graded incorrect.
pub fn solution(question: &Question) -> String {
    match question {
        Question::MultipleChoice { explanation, .. } => format!(
            "Correct answer: {}\nExplanation: {explanation}",
            question.answer_display()
        ),
        Question::FreeResponse { rubric_points, .. } => {
            let mut out = format!("Expected answer: {}", question.answer_display());
            for point in rubric_points {
                let _ = write!(out, "\n  - {point}");
            }
            out
        }
    }
}
