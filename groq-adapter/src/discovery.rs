//! Resolution of the Groq API key and endpoint overrides.

use crate::error::GroqError;

/// Environment variable holding the Groq API key.
pub const API_KEY_ENV_VAR: &str = "GROQ_API_KEY";

/// Environment variable overriding the default model identifier.
pub const MODEL_ENV_VAR: &str = "GROQ_MODEL";

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV_VAR: &str = "GROQ_BASE_URL";

/// Locates the Groq API key.
///
/// Resolution order:
/// 1. `explicit` if provided and non-blank.
/// 2. The value of the `GROQ_API_KEY` environment variable.
///
/// # Errors
///
/// Returns `GroqError::MissingApiKey` when neither source yields a key.
pub fn resolve_api_key(explicit: Option<String>) -> Result<String, GroqError> {
    if let Some(key) = explicit {
        let key = key.trim();
        if !key.is_empty() {
            return Ok(key.to_string());
        }
        return Err(GroqError::MissingApiKey(
            "explicit API key is blank".to_string(),
        ));
    }

    match std::env::var(API_KEY_ENV_VAR) {
        Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(GroqError::MissingApiKey(format!(
            "{API_KEY_ENV_VAR} is not set"
        ))),
    }
}

/// Reads a non-blank environment override, if present.
pub(crate) fn env_override(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_key_wins_and_is_trimmed() {
        let key = resolve_api_key(Some("  gsk_test  ".to_string())).unwrap();
        assert_eq!(key, "gsk_test");
    }

    #[test]
    fn test_blank_explicit_key_is_rejected() {
        let err = resolve_api_key(Some("   ".to_string())).unwrap_err();
        assert!(matches!(err, GroqError::MissingApiKey(_)));
    }

    #[test]
    fn test_env_override_ignores_unset_variables() {
        assert!(env_override("CALCBC_TEST_SURELY_UNSET_VARIABLE").is_none());
    }
}
