use crate::catalog::BookRecord;
use serde::{Deserialize, Serialize};

/// Word budget for descriptions shown in browse results.
pub const DESC_TRUNCATE_WORDS: usize = 30;

/// The canonical projection returned by the recommendation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub authors: String,
    pub average_rating: f32,
    pub num_pages: Option<i64>,
    pub published_year: Option<i64>,
    pub isbn13: i64,
}

impl From<&BookRecord> for Recommendation {
    fn from(record: &BookRecord) -> Self {
        Self {
            title: record.title.clone(),
            authors: record.authors.clone(),
            average_rating: record.average_rating,
            num_pages: record.num_pages,
            published_year: record.published_year,
            isbn13: record.isbn13,
        }
    }
}

/// Richer projection for browsing: display-formatted authors, a truncated
/// description, and the optional category/thumbnail columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDetails {
    pub isbn13: i64,
    pub title: String,
    pub authors: String,
    pub average_rating: f32,
    pub description: String,
    pub category: Option<String>,
    pub thumbnail: Option<String>,
}

impl From<&BookRecord> for BookDetails {
    fn from(record: &BookRecord) -> Self {
        Self {
            isbn13: record.isbn13,
            title: record.title.clone(),
            authors: format_authors(&record.authors),
            average_rating: record.average_rating,
            description: truncate_description(
                record.description.as_deref().unwrap_or_default(),
                DESC_TRUNCATE_WORDS,
            ),
            category: record.simple_categories.clone(),
            thumbnail: record.thumbnail.clone(),
        }
    }
}

/// Emotional tones a reader can ask for, each backed by one of the
/// catalog's per-emotion score columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    Happy,
    Surprising,
    Angry,
    Suspenseful,
    Sad,
}

impl Tone {
    pub const ALL: [Tone; 5] = [
        Tone::Happy,
        Tone::Surprising,
        Tone::Angry,
        Tone::Suspenseful,
        Tone::Sad,
    ];

    /// The catalog column holding this tone's score.
    pub fn emotion_column(self) -> &'static str {
        match self {
            Tone::Happy => "joy",
            Tone::Surprising => "surprise",
            Tone::Angry => "anger",
            Tone::Suspenseful => "fear",
            Tone::Sad => "sadness",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tone::Happy => "Happy",
            Tone::Surprising => "Surprising",
            Tone::Angry => "Angry",
            Tone::Suspenseful => "Suspenseful",
            Tone::Sad => "Sad",
        }
    }
}

/// Formats a semicolon-delimited author list for display.
pub fn format_authors(authors: &str) -> String {
    let trimmed = authors.trim();
    if trimmed.is_empty() || trimmed == "Unknown" {
        return "Unknown".to_string();
    }

    let list: Vec<&str> = trimmed.split(';').map(str::trim).collect();
    match list.as_slice() {
        [] => "Unknown".to_string(),
        [only] => (*only).to_string(),
        [first, second] => format!("{first} and {second}"),
        [leading @ .., last] => format!("{}, and {last}", leading.join(", ")),
    }
}

/// Truncates a description to a word budget, appending an ellipsis when
/// anything was cut.
pub fn truncate_description(description: &str, max_words: usize) -> String {
    if description.trim().is_empty() {
        return "No description available".to_string();
    }

    let words: Vec<&str> = description.split_whitespace().collect();
    if words.len() <= max_words {
        return description.to_string();
    }
    format!("{}...", words[..max_words].join(" "))
}
