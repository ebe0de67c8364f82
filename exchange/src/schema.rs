//! JSON schemas for question payloads.
//!
//! The same schema value is embedded in the generation prompt and used by
//! the validator, so the model is told exactly what will be checked.

use serde_json::{json, Value};

use crate::question::QuestionKind;

/// Schema a multiple-choice payload must satisfy.
#[must_use]
pub fn multiple_choice_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "kind": {
                "const": "MCQ",
                "description": "Variant tag, exactly \"MCQ\""
            },
            "prompt": {
                "type": "string",
                "minLength": 1,
                "description": "The question stem"
            },
            "choices": {
                "type": "array",
                "items": {"type": "string", "minLength": 1},
                "minItems": 4,
                "maxItems": 4,
                "uniqueItems": true,
                "description": "Exactly four distinct option texts, without letter prefixes"
            },
            "correct_choice": {
                "type": "string",
                "enum": ["A", "B", "C", "D"],
                "description": "Letter of the correct option (A = first choice)"
            },
            "explanation": {
                "type": "string",
                "minLength": 1,
                "description": "Concise step-by-step reasoning for the correct option"
            }
        },
        "required": ["kind", "prompt", "choices", "correct_choice", "explanation"]
    })
}

/// Schema a free-response payload must satisfy.
#[must_use]
pub fn free_response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "kind": {
                "const": "FRQ",
                "description": "Variant tag, exactly \"FRQ\""
            },
            "prompt": {
                "type": "string",
                "minLength": 1,
                "description": "The question stem"
            },
            "expected_answer": {
                "type": "string",
                "minLength": 1,
                "description": "Concise numerical or analytical answer"
            },
            "rubric_points": {
                "type": "array",
                "items": {"type": "string", "minLength": 1},
                "minItems": 1,
                "description": "Ordered points a complete answer must address"
            }
        },
        "required": ["kind", "prompt", "expected_answer", "rubric_points"]
    })
}

/// Schema for the requested kind.
#[must_use]
pub fn schema_for(kind: QuestionKind) -> Value {
    match kind {
        QuestionKind::MultipleChoice => multiple_choice_schema(),
        QuestionKind::FreeResponse => free_response_schema(),
    }
}

/// A conforming example payload, shown to the model alongside the schema.
#[must_use]
pub fn example_for(kind: QuestionKind) -> Value {
    match kind {
        QuestionKind::MultipleChoice => json!({
            "kind": "MCQ",
            "prompt": "What is the limit of sin(x)/x as x approaches 0?",
            "choices": ["1", "0", "-1", "The limit does not exist"],
            "correct_choice": "A",
            "explanation": "Apply L'Hopital's Rule: the limit equals cos(0)/1 = 1."
        }),
        QuestionKind::FreeResponse => json!({
            "kind": "FRQ",
            "prompt": "Find the derivative of f(x) = x^3 + 2x.",
            "expected_answer": "3x^2 + 2",
            "rubric_points": [
                "Applies the power rule to x^3 to get 3x^2",
                "Differentiates 2x to 2",
                "States f'(x) = 3x^2 + 2"
            ]
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemas_compile_and_accept_their_examples() {
        for kind in [QuestionKind::MultipleChoice, QuestionKind::FreeResponse] {
            let validator = jsonschema::Validator::new(&schema_for(kind)).unwrap();
            assert!(validator.is_valid(&example_for(kind)), "{kind} example rejected");
        }
    }

    #[test]
    fn test_schemas_do_not_accept_the_other_kind() {
        let mcq = jsonschema::Validator::new(&multiple_choice_schema()).unwrap();
        assert!(!mcq.is_valid(&example_for(QuestionKind::FreeResponse)));

        let frq = jsonschema::Validator::new(&free_response_schema()).unwrap();
        assert!(!frq.is_valid(&example_for(QuestionKind::MultipleChoice)));
    }
}
