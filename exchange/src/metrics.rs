//! Metrics tracking and token estimation for generation exchanges.

use std::time::Duration;

/// Metrics collected during one generation exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExchangeMetrics {
    /// Total number of backend calls made.
    pub total_attempts: usize,
    /// Wall-clock time elapsed across all attempts.
    pub wall_time: Duration,
    /// Estimated input tokens sent to the backend, summed over attempts.
    pub estimated_input_tokens: usize,
    /// Estimated output tokens received from the backend, summed over attempts.
    pub estimated_output_tokens: usize,
}

/// Estimate token count from text using the 4-chars-per-token heuristic.
///
/// Counts chars rather than bytes and rounds up.
///
/// # Examples
///
/// ```
/// use calcbc_exchange::metrics::estimate_tokens;
///
/// assert_eq!(estimate_tokens("hello"), 2);
/// assert_eq!(estimate_tokens("hello world"), 3);
/// ```
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimates_round_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("a"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn test_math_symbols_count_as_single_chars() {
        // 6 chars, 14 bytes
        assert_eq!(estimate_tokens("∫ x dx"), 2);
        assert_eq!(estimate_tokens("∑∞"), 1);
    }
}
