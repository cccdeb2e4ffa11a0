use tracing::warn;

// An ISBN-13 has exactly 13 decimal digits.
const ISBN13_MIN: i64 = 1_000_000_000_000;
const ISBN13_MAX: i64 = 9_999_999_999_999;

/// Pulls the catalog identifier off the front of a retrieved document.
///
/// The vector store hands back free text whose first token is expected to
/// be the ISBN-13 the document was tagged with, but that structure is not
/// guaranteed. Surrounding quotes and whitespace are stripped, the text is
/// split at the first whitespace run, and the leading token must parse as
/// an integer with exactly 13 decimal digits. Anything else yields `None`
/// with a warning so a single malformed document never fails a whole
/// query.
pub fn parse_isbn13(content: &str) -> Option<i64> {
    let cleaned = content.trim().trim_matches('"').trim();

    let Some(candidate) = cleaned.split_whitespace().next() else {
        warn!("empty document content, no ISBN to extract");
        return None;
    };

    match candidate.parse::<i64>() {
        Ok(isbn) if (ISBN13_MIN..=ISBN13_MAX).contains(&isbn) => Some(isbn),
        Ok(isbn) => {
            warn!("invalid ISBN length: {isbn}");
            None
        }
        Err(err) => {
            warn!("failed to parse ISBN from '{}': {err}", preview(cleaned));
            None
        }
    }
}

fn preview(content: &str) -> String {
    content.chars().take(50).collect()
}
