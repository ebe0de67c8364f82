//! Parsing and structural validation of raw backend responses.

use serde_json::Value;

use crate::question::{Question, QuestionKind};
use crate::schema::schema_for;

/// Outcome of validating one parsed payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationResult {
    /// `true` when `errors` is empty.
    pub valid: bool,
    /// Human-readable problems, in discovery order.
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Builds a result from a list of errors.
    #[must_use]
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Parses a raw completion as JSON.
///
/// Models sometimes wrap JSON in a Markdown fence even when told not to, so a
/// single surrounding ```` ``` ```` / ```` ```json ```` fence is removed first.
///
/// # Errors
///
/// Returns the `serde_json` error message when the text is not valid JSON.
pub fn parse_response(raw: &str) -> Result<Value, String> {
    serde_json::from_str::<Value>(strip_code_fence(raw)).map_err(|e| e.to_string())
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop an info string such as `json` on the opening fence line.
    match body.split_once('\n') {
        Some((info, inner)) if !info.trim_start().starts_with(['{', '[']) => inner.trim(),
        Some(_) => body.trim(),
        None => body.find(['{', '[']).map_or(body, |start| &body[start..]).trim(),
    }
}

/// Collect all validation errors from jsonschema validation.
///
/// Returns a vector of formatted error strings with instance paths.
/// Uses `iter_errors()` to collect ALL validation failures, not just the first.
#[must_use]
pub fn collect_validation_errors(schema: &Value, instance: &Value) -> Vec<String> {
    match jsonschema::Validator::new(schema) {
        Ok(validator) => validator
            .iter_errors(instance)
            .map(|error| format!("At path '{}': {}", error.instance_path, error))
            .collect(),
        Err(e) => vec![format!("Schema compilation error: {e}")],
    }
}

/// Checks jsonschema cannot express: blank text and near-duplicate or
/// self-labeled choices.
#[must_use]
pub fn semantic_errors(kind: QuestionKind, instance: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    let text_fields: &[&str] = match kind {
        QuestionKind::MultipleChoice => &["prompt", "explanation"],
        QuestionKind::FreeResponse => &["prompt", "expected_answer"],
    };
    for field in text_fields {
        if let Some(text) = instance.get(*field).and_then(Value::as_str) {
            if text.trim().is_empty() {
                errors.push(format!("At path '/{field}': must not be blank"));
            }
        }
    }

    match kind {
        QuestionKind::MultipleChoice => {
            if let Some(choices) = string_items(instance, "choices") {
                check_choices(&choices, &mut errors);
            }
        }
        QuestionKind::FreeResponse => {
            if let Some(points) = string_items(instance, "rubric_points") {
                for (i, point) in points.iter().enumerate() {
                    if point.trim().is_empty() {
                        errors.push(format!("At path '/rubric_points/{i}': must not be blank"));
                    }
                }
            }
        }
    }

    errors
}

fn string_items<'a>(instance: &'a Value, field: &str) -> Option<Vec<&'a str>> {
    instance
        .get(field)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
}

/// Collapses runs of whitespace. Case is kept: `F(x)` and `f(x)` differ.
fn normalize_choice(choice: &str) -> String {
    choice.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn check_choices(choices: &[&str], errors: &mut Vec<String>) {
    let normalized: Vec<String> = choices.iter().map(|c| normalize_choice(c)).collect();

    for (i, choice) in choices.iter().enumerate() {
        if choice.trim().is_empty() {
            errors.push(format!("At path '/choices/{i}': must not be blank"));
            continue;
        }
        if has_label_prefix(choice) {
            errors.push(format!(
                "At path '/choices/{i}': \"{choice}\" must contain only the option text, without a leading letter such as \"A. \""
            ));
        }
        // Exact duplicates are already reported by `uniqueItems`.
        let near_duplicate = (0..i).any(|j| {
            !normalized[i].is_empty() && normalized[j] == normalized[i] && choices[j] != *choice
        });
        if near_duplicate {
            errors.push(format!(
                "At path '/choices/{i}': \"{choice}\" duplicates an earlier choice; all four choices must be distinct"
            ));
        }
    }
}

fn has_label_prefix(choice: &str) -> bool {
    let mut chars = choice.trim_start().trim_start_matches('(').chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some('A'..='D'), Some('.' | ')' | ':'), Some(' ') | None)
    )
}

/// Validates a parsed payload for the requested kind.
#[must_use]
pub fn validate_payload(kind: QuestionKind, instance: &Value) -> ValidationResult {
    let mut errors = collect_validation_errors(&schema_for(kind), instance);
    errors.extend(semantic_errors(kind, instance));
    ValidationResult::from_errors(errors)
}

/// Validates a payload and converts it into a [`Question`].
///
/// # Errors
///
/// Returns the failed [`ValidationResult`] when the payload does not conform.
pub fn into_question(kind: QuestionKind, instance: Value) -> Result<Question, ValidationResult> {
    let result = validate_payload(kind, &instance);
    if !result.valid {
        return Err(result);
    }

    serde_json::from_value::<Question>(instance).map_err(|e| {
        ValidationResult::from_errors(vec![format!(
            "Payload passed the schema but could not be read as a question: {e}"
        )])
    })
}
