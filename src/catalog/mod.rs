use anyhow::{bail, Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::info;

/// Columns every usable catalog must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = ["isbn13", "title", "authors", "average_rating"];

/// Per-emotion score columns, present only in enriched catalog exports.
pub const EMOTION_COLUMNS: [&str; 7] = [
    "anger", "disgust", "fear", "joy", "sadness", "surprise", "neutral",
];

// Numeric columns in cleaned exports often come through as float-formatted
// strings ("1999.0"), so integer fields parse via f64 when needed.
fn int_from_numeric_str<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .or_else(|_| value.parse::<f64>().map(|v| v as i64))
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// One row of the book catalog, keyed by ISBN-13.
///
/// Loaded once at startup and never mutated afterwards; the retrieval
/// pipeline only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRecord {
    pub isbn13: i64,
    pub title: String,
    /// Semicolon-delimited author list.
    pub authors: String,
    pub average_rating: f32,
    #[serde(default, deserialize_with = "int_from_numeric_str")]
    pub num_pages: Option<i64>,
    #[serde(default, deserialize_with = "int_from_numeric_str")]
    pub published_year: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub simple_categories: Option<String>,
    #[serde(default)]
    pub anger: Option<f32>,
    #[serde(default)]
    pub disgust: Option<f32>,
    #[serde(default)]
    pub fear: Option<f32>,
    #[serde(default)]
    pub joy: Option<f32>,
    #[serde(default)]
    pub sadness: Option<f32>,
    #[serde(default)]
    pub surprise: Option<f32>,
    #[serde(default)]
    pub neutral: Option<f32>,
}

impl BookRecord {
    /// Looks up one of the per-emotion scores by column name.
    pub fn emotion_score(&self, emotion: &str) -> Option<f32> {
        match emotion {
            "anger" => self.anger,
            "disgust" => self.disgust,
            "fear" => self.fear,
            "joy" => self.joy,
            "sadness" => self.sadness,
            "surprise" => self.surprise,
            "neutral" => self.neutral,
            _ => None,
        }
    }
}

/// Optional catalog columns, resolved once when the catalog is loaded so
/// nothing downstream has to probe rows per request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogCapabilities {
    pub categories: bool,
    pub emotions: bool,
    pub thumbnails: bool,
}

/// The in-memory book table, indexed by ISBN-13.
#[derive(Debug)]
pub struct Catalog {
    records: Vec<BookRecord>,
    by_isbn: HashMap<i64, usize>,
    capabilities: CatalogCapabilities,
}

impl Catalog {
    /// Loads the catalog from a CSV export.
    ///
    /// Fails fast on a missing file, a missing required column, or a
    /// malformed row; a half-loaded catalog would silently degrade every
    /// query after it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("failed to open catalog {}", path.display()))?;

        let headers = reader
            .headers()
            .context("catalog has no header row")?
            .clone();

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();
        if !missing.is_empty() {
            bail!("catalog is missing required columns: {}", missing.join(", "));
        }

        let capabilities = CatalogCapabilities {
            categories: headers.iter().any(|h| h == "simple_categories"),
            emotions: EMOTION_COLUMNS
                .iter()
                .all(|column| headers.iter().any(|h| h == *column)),
            thumbnails: headers.iter().any(|h| h == "thumbnail"),
        };

        let mut records = Vec::new();
        for (index, row) in reader.deserialize::<BookRecord>().enumerate() {
            let record = row.with_context(|| format!("malformed catalog row {}", index + 2))?;
            records.push(record);
        }

        info!(
            "loaded {} books from {} (categories: {}, emotions: {})",
            records.len(),
            path.display(),
            capabilities.categories,
            capabilities.emotions,
        );
        Ok(Self::index(records, capabilities))
    }

    /// Builds a catalog from rows that are already in memory.
    ///
    /// Capability flags are derived from the rows themselves: a capability
    /// is present when at least one record carries the column.
    pub fn from_records(records: Vec<BookRecord>) -> Self {
        let capabilities = CatalogCapabilities {
            categories: records.iter().any(|r| r.simple_categories.is_some()),
            emotions: records.iter().any(|r| {
                EMOTION_COLUMNS
                    .iter()
                    .all(|column| r.emotion_score(column).is_some())
            }),
            thumbnails: records.iter().any(|r| r.thumbnail.is_some()),
        };
        Self::index(records, capabilities)
    }

    fn index(records: Vec<BookRecord>, capabilities: CatalogCapabilities) -> Self {
        let by_isbn = records
            .iter()
            .enumerate()
            .map(|(position, record)| (record.isbn13, position))
            .collect();
        Self {
            records,
            by_isbn,
            capabilities,
        }
    }

    pub fn get(&self, isbn13: i64) -> Option<&BookRecord> {
        self.by_isbn.get(&isbn13).map(|&position| &self.records[position])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capabilities(&self) -> CatalogCapabilities {
        self.capabilities
    }

    /// Sorted, deduplicated category labels, for dropdown population.
    pub fn categories(&self) -> Vec<String> {
        self.records
            .iter()
            .filter_map(|record| record.simple_categories.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp csv");
        file.write_all(content.as_bytes()).expect("write temp csv");
        file
    }

    #[test]
    fn loads_a_minimal_catalog() {
        let file = write_csv(
            "isbn13,title,authors,average_rating\n\
             9780000000001,The Martian,Andy Weir,4.4\n\
             9780000000002,Dune,Frank Herbert,4.2\n",
        );

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(9780000000001).unwrap().title, "The Martian");
        assert!(catalog.get(9999999999999).is_none());
        assert_eq!(catalog.capabilities(), CatalogCapabilities::default());
    }

    #[test]
    fn missing_required_column_fails_loading() {
        let file = write_csv("isbn13,title,authors\n9780000000001,The Martian,Andy Weir\n");

        let err = Catalog::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("average_rating"));
    }

    #[test]
    fn malformed_row_fails_loading() {
        let file = write_csv(
            "isbn13,title,authors,average_rating\n\
             not-an-isbn,The Martian,Andy Weir,4.4\n",
        );

        let err = Catalog::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn float_formatted_integer_columns_parse() {
        let file = write_csv(
            "isbn13,title,authors,average_rating,num_pages,published_year\n\
             9780000000001,The Martian,Andy Weir,4.4,384.0,2011.0\n\
             9780000000002,Dune,Frank Herbert,4.2,,\n",
        );

        let catalog = Catalog::load(file.path()).unwrap();
        let martian = catalog.get(9780000000001).unwrap();
        assert_eq!(martian.num_pages, Some(384));
        assert_eq!(martian.published_year, Some(2011));

        let dune = catalog.get(9780000000002).unwrap();
        assert_eq!(dune.num_pages, None);
        assert_eq!(dune.published_year, None);
    }

    #[test]
    fn capability_flags_follow_the_header_row() {
        let file = write_csv(
            "isbn13,title,authors,average_rating,simple_categories,thumbnail,\
             anger,disgust,fear,joy,sadness,surprise,neutral\n\
             9780000000001,The Martian,Andy Weir,4.4,Fiction,http://covers/1.jpg,\
             0.1,0.1,0.3,0.6,0.2,0.4,0.5\n",
        );

        let catalog = Catalog::load(file.path()).unwrap();
        let capabilities = catalog.capabilities();
        assert!(capabilities.categories);
        assert!(capabilities.emotions);
        assert!(capabilities.thumbnails);
        assert_eq!(catalog.get(9780000000001).unwrap().joy, Some(0.6));
    }

    #[test]
    fn partial_emotion_columns_do_not_enable_the_capability() {
        let file = write_csv(
            "isbn13,title,authors,average_rating,joy\n\
             9780000000001,The Martian,Andy Weir,4.4,0.6\n",
        );

        let catalog = Catalog::load(file.path()).unwrap();
        assert!(!catalog.capabilities().emotions);
    }

    #[test]
    fn categories_are_sorted_and_deduplicated() {
        let file = write_csv(
            "isbn13,title,authors,average_rating,simple_categories\n\
             9780000000001,The Martian,Andy Weir,4.4,Fiction\n\
             9780000000002,Sapiens,Yuval Noah Harari,4.5,Nonfiction\n\
             9780000000003,Dune,Frank Herbert,4.2,Fiction\n",
        );

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.categories(), vec!["Fiction", "Nonfiction"]);
    }
}
