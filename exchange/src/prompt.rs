//! Prompt construction and corrective feedback for the generation retry loop.

use serde_json::Value;
use std::fmt::Write;
use std::time::Duration;

use crate::question::QuestionKind;
use crate::request::GenerationRequest;
use crate::schema::{example_for, schema_for};

/// System preamble sent alongside every generation prompt.
pub const SYSTEM_PREAMBLE: &str =
    "You are a helpful assistant that generates AP Calculus BC questions in a strict JSON format.";

/// Build the initial generation prompt for a request.
///
/// The prompt names the curriculum domain and question kind, embeds the
/// schema the response is validated against, and shows a conforming example.
#[must_use]
pub fn build_generation_prompt(request: &GenerationRequest) -> String {
    let kind = request.kind;
    let mut prompt = String::new();

    prompt.push_str(
        "You are an expert AP Calculus BC teacher. Generate a single, accurate and concise \
         AP Calculus BC practice question in strict JSON format.\n\n",
    );

    let _ = writeln!(prompt, "Question type: {}", kind.describe());
    let _ = writeln!(
        prompt,
        "Topic: {}",
        request.topic.as_deref().unwrap_or("any AP Calculus BC topic")
    );
    if let Some(difficulty) = request.difficulty {
        let _ = writeln!(prompt, "Difficulty: {difficulty}");
    }
    if let Some(calculator) = request.calculator_active {
        let _ = writeln!(
            prompt,
            "Calculator: {}",
            if calculator { "allowed" } else { "not allowed" }
        );
    }

    prompt.push_str("\nRules:\n");
    for rule in rules_for(kind) {
        prompt.push_str("  - ");
        prompt.push_str(rule);
        prompt.push('\n');
    }

    prompt.push_str("\nThe response must conform to this JSON schema:\n");
    prompt.push_str(&pretty(&schema_for(kind)));

    prompt.push_str("\n\nExample of a conforming response:\n");
    prompt.push_str(&pretty(&example_for(kind)));

    prompt.push_str(
        "\n\nDo NOT include any conversational text, markdown, or comments. \
         Respond ONLY with the JSON object.",
    );

    prompt
}

fn rules_for(kind: QuestionKind) -> &'static [&'static str] {
    match kind {
        QuestionKind::MultipleChoice => &[
            "Set \"kind\" to exactly \"MCQ\".",
            "Provide exactly four distinct options in \"choices\". Each option contains ONLY the option text, without leading letters such as \"A. \".",
            "\"correct_choice\" is the letter (A, B, C or D) of the correct option in the order given, not the option text.",
            "\"explanation\" is a concise, accurate step-by-step justification of the correct option.",
        ],
        QuestionKind::FreeResponse => &[
            "Set \"kind\" to exactly \"FRQ\".",
            "\"expected_answer\" is the concise numerical or analytical correct value or expression.",
            "\"rubric_points\" lists, in order, the steps a complete answer must show.",
        ],
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Build validation feedback message for the model with complete error context.
///
/// Includes:
/// - Attempt counter (e.g., "Attempt 2/3")
/// - All validation errors, verbatim
/// - Full expected schema (when `schema` is provided)
/// - Echoed submission (so the model can compare)
/// - Instruction to fix and resubmit
///
/// # Examples
///
/// ```
/// use calcbc_exchange::prompt::build_validation_feedback;
/// use serde_json::json;
///
/// let instance = json!({"kind": "MCQ"});
/// let errors = vec!["At path '': \"prompt\" is a required property".to_string()];
///
/// let feedback = build_validation_feedback(None, &instance, &errors, 1, 3);
/// assert!(feedback.contains("Attempt 1/3"));
/// assert!(feedback.contains("JSON validation failed"));
/// ```
#[must_use]
pub fn build_validation_feedback(
    schema: Option<&Value>,
    instance: &Value,
    errors: &[String],
    attempt: usize,
    max_attempts: usize,
) -> String {
    let mut feedback = format!("Attempt {attempt}/{max_attempts}: JSON validation failed.\n\n");

    feedback.push_str("Errors:\n");
    for error in errors {
        feedback.push_str("  - ");
        feedback.push_str(error);
        feedback.push('\n');
    }

    if let Some(schema) = schema {
        feedback.push_str("\nExpected schema:\n");
        feedback.push_str(&pretty(schema));
        feedback.push('\n');
    }

    feedback.push_str("\nYour submission:\n");
    feedback.push_str(&pretty(instance));

    feedback.push_str("\n\nPlease fix all errors and respond with the corrected JSON object only.");

    feedback
}

/// Build parse error feedback for when the response is not valid JSON.
///
/// Includes:
/// - Attempt counter
/// - Parse error message
/// - Truncated raw output (first 500 chars)
/// - Expected schema (when `schema` is provided)
/// - Instruction to respond with valid JSON
///
/// # Examples
///
/// ```
/// use calcbc_exchange::prompt::build_parse_error_feedback;
///
/// let feedback = build_parse_error_feedback("Sure! Here it is", "expected value", 1, 3, None);
/// assert!(feedback.contains("Attempt 1/3"));
/// assert!(feedback.contains("Could not parse"));
/// ```
#[must_use]
pub fn build_parse_error_feedback(
    raw_text: &str,
    parse_error: &str,
    attempt: usize,
    max_attempts: usize,
    schema: Option<&Value>,
) -> String {
    let mut feedback = format!(
        "Attempt {attempt}/{max_attempts}: Could not parse your response as JSON.\n\n"
    );

    feedback.push_str("Parse error: ");
    feedback.push_str(parse_error);
    feedback.push_str("\n\n");

    feedback.push_str("Your response (first 500 chars):\n");
    // Truncate on a char boundary; byte slicing panics inside multi-byte math symbols.
    if raw_text.chars().count() > 500 {
        let truncated: String = raw_text.chars().take(500).collect();
        feedback.push_str(&truncated);
        feedback.push_str("...");
    } else {
        feedback.push_str(raw_text);
    }

    if let Some(schema) = schema {
        feedback.push_str("\n\nExpected schema:\n");
        feedback.push_str(&pretty(schema));
    }

    feedback.push_str("\n\nPlease respond with a single valid JSON object matching the schema.");

    feedback
}

/// Build feedback for an attempt that produced no response in time.
#[must_use]
pub fn build_timeout_feedback(limit: Duration, attempt: usize, max_attempts: usize) -> String {
    format!(
        "Attempt {attempt}/{max_attempts}: no response within {:.1}s. \
         Keep the question short and respond with the JSON object only.",
        limit.as_secs_f64()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::Difficulty;
    use serde_json::json;

    #[test]
    fn test_generation_prompt_names_domain_kind_and_schema() {
        let request = GenerationRequest::new(QuestionKind::MultipleChoice)
            .with_topic("Unit 3: The Chain Rule")
            .with_difficulty(Difficulty::Hard)
            .with_calculator(false);
        let prompt = build_generation_prompt(&request);

        assert!(prompt.contains("AP Calculus BC"));
        assert!(prompt.contains("multiple-choice question (MCQ)"));
        assert!(prompt.contains("Topic: Unit 3: The Chain Rule"));
        assert!(prompt.contains("Difficulty: Hard"));
        assert!(prompt.contains("Calculator: not allowed"));
        assert!(prompt.contains("\"correct_choice\""));
        assert!(prompt.contains("\"maxItems\": 4"));
    }

    #[test]
    fn test_generation_prompt_defaults_the_topic() {
        let prompt = build_generation_prompt(&GenerationRequest::new(QuestionKind::FreeResponse));
        assert!(prompt.contains("Topic: any AP Calculus BC topic"));
        assert!(prompt.contains("\"rubric_points\""));
        assert!(!prompt.contains("Difficulty:"));
    }

    #[test]
    fn test_validation_feedback_lists_errors_verbatim() {
        let instance = json!({"kind": "MCQ", "choices": ["1"]});
        let errors = vec![
            "At path '/choices': [\"1\"] has less than 4 items".to_string(),
            "At path '': \"prompt\" is a required property".to_string(),
        ];
        let schema = json!({"type": "object"});

        let feedback = build_validation_feedback(Some(&schema), &instance, &errors, 2, 3);

        assert!(feedback.contains("Attempt 2/3"));
        for error in &errors {
            assert!(feedback.contains(error.as_str()));
        }
        assert!(feedback.contains("Expected schema:"));
        assert!(feedback.contains("Your submission:"));
    }

    #[test]
    fn test_validation_feedback_can_omit_schema() {
        let feedback = build_validation_feedback(None, &json!({}), &["x".to_string()], 1, 3);
        assert!(!feedback.contains("Expected schema:"));
    }

    #[test]
    fn test_parse_error_feedback_truncates_long_text() {
        let raw_text = "∫".repeat(1000);

        let feedback = build_parse_error_feedback(&raw_text, "error", 1, 3, None);

        assert!(feedback.contains("..."));
        let response_section = feedback.split("Your response").nth(1).unwrap();
        assert!(response_section.chars().filter(|c| *c == '∫').count() == 500);
    }

    #[test]
    fn test_timeout_feedback_mentions_the_limit() {
        let feedback = build_timeout_feedback(Duration::from_millis(1500), 1, 2);
        assert!(feedback.contains("Attempt 1/2"));
        assert!(feedback.contains("1.5s"));
    }
}
