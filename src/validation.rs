use crate::error::{RecommenderError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

pub const MIN_QUERY_LENGTH: usize = 3;
pub const MAX_QUERY_LENGTH: usize = 500;

/// Upper bound for `top_k` unless a caller passes its own.
pub const MAX_TOP_K: usize = 100;

// Word characters, whitespace and a small punctuation set survive
// sanitization; everything else is stripped.
static DISALLOWED_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[^\w\s.,!?'"-]+"#).unwrap());

/// Validates and sanitizes a search query.
///
/// The query is trimmed, bounds-checked against
/// [`MIN_QUERY_LENGTH`]/[`MAX_QUERY_LENGTH`], and stripped of any character
/// outside the permitted class. A query that sanitizes down to nothing is
/// rejected.
pub fn validate_query(query: &str) -> Result<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(RecommenderError::InvalidInput(
            "Query must be a non-empty string".to_string(),
        ));
    }

    let length = trimmed.chars().count();
    if length < MIN_QUERY_LENGTH {
        return Err(RecommenderError::InvalidInput(format!(
            "Query too short. Minimum {MIN_QUERY_LENGTH} characters required."
        )));
    }
    if length > MAX_QUERY_LENGTH {
        return Err(RecommenderError::InvalidInput(format!(
            "Query too long. Maximum {MAX_QUERY_LENGTH} characters allowed."
        )));
    }

    let sanitized = DISALLOWED_CHARS.replace_all(trimmed, "").into_owned();
    if sanitized.is_empty() {
        return Err(RecommenderError::InvalidInput(
            "Query contains only invalid characters".to_string(),
        ));
    }

    debug!("validated query ({length} chars)");
    Ok(sanitized)
}

/// Validates the requested result count against `[1, max_value]`.
pub fn validate_top_k(top_k: usize, max_value: usize) -> Result<usize> {
    if top_k < 1 {
        return Err(RecommenderError::InvalidInput(
            "top_k must be at least 1".to_string(),
        ));
    }
    if top_k > max_value {
        return Err(RecommenderError::InvalidInput(format!(
            "top_k cannot exceed {max_value}"
        )));
    }
    Ok(top_k)
}

/// Validates an optional minimum-rating threshold.
///
/// `None` disables the quality filter entirely. `Some(0.0)` keeps the
/// filter enabled with a threshold every book passes; only `None` turns it
/// off. NaN fails the range check.
pub fn validate_rating(rating: Option<f32>) -> Result<Option<f32>> {
    let Some(rating) = rating else {
        return Ok(None);
    };
    if !(0.0..=5.0).contains(&rating) {
        return Err(RecommenderError::InvalidInput(
            "Rating must be between 0 and 5".to_string(),
        ));
    }
    Ok(Some(rating))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_below_minimum_length_is_rejected() {
        assert!(validate_query("ab").is_err());
        assert!(validate_query("  ab  ").is_err());
    }

    #[test]
    fn query_at_minimum_length_passes() {
        assert_eq!(validate_query("abc").unwrap(), "abc");
    }

    #[test]
    fn query_above_maximum_length_is_rejected() {
        let long = "a".repeat(MAX_QUERY_LENGTH + 1);
        assert!(validate_query(&long).is_err());

        let exactly = "a".repeat(MAX_QUERY_LENGTH);
        assert!(validate_query(&exactly).is_ok());
    }

    #[test]
    fn empty_and_whitespace_queries_are_rejected() {
        assert!(validate_query("").is_err());
        assert!(validate_query("   \t\n").is_err());
    }

    #[test]
    fn disallowed_characters_are_stripped() {
        assert_eq!(
            validate_query("space <script>adventure</script>").unwrap(),
            "space scriptadventurescript"
        );
        assert_eq!(
            validate_query("mystery, thriller! why-not?").unwrap(),
            "mystery, thriller! why-not?"
        );
    }

    #[test]
    fn query_of_only_invalid_characters_is_rejected() {
        assert!(validate_query("<<<>>>").is_err());
    }

    #[test]
    fn top_k_bounds_are_enforced() {
        assert!(validate_top_k(0, MAX_TOP_K).is_err());
        assert_eq!(validate_top_k(1, MAX_TOP_K).unwrap(), 1);
        assert_eq!(validate_top_k(100, MAX_TOP_K).unwrap(), 100);
        assert!(validate_top_k(101, MAX_TOP_K).is_err());
    }

    #[test]
    fn rating_bounds_are_enforced() {
        assert!(validate_rating(Some(-0.1)).is_err());
        assert_eq!(validate_rating(Some(0.0)).unwrap(), Some(0.0));
        assert_eq!(validate_rating(Some(5.0)).unwrap(), Some(5.0));
        assert!(validate_rating(Some(5.1)).is_err());
        assert!(validate_rating(Some(f32::NAN)).is_err());
    }

    #[test]
    fn absent_rating_disables_the_filter() {
        assert_eq!(validate_rating(None).unwrap(), None);
    }
}
