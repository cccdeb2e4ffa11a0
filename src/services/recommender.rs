use crate::catalog::{BookRecord, Catalog};
use crate::error::{RecommenderError, Result};
use crate::isbn::parse_isbn13;
use crate::models::{BookDetails, Recommendation, Tone};
use crate::services::vector_search::SimilaritySearch;
use crate::validation::{validate_query, validate_rating, validate_top_k, MAX_TOP_K};
use anyhow::Context;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// When a rating threshold is set, this many times `top_k` candidates are
/// fetched so the filter can discard an unknown fraction of them and still
/// leave enough to fill the result.
pub const SEARCH_MULTIPLIER: usize = 5;

/// Quality threshold applied when an operation does not take its own.
pub const DEFAULT_MIN_RATING: f32 = 3.5;

/// Orchestrates the retrieval pipeline: validate, search, reconcile the
/// retrieved identifiers against the catalog, filter, and rank.
///
/// Holds only shared read-only state, so one instance serves any number of
/// concurrent requests without locking.
pub struct RecommenderService {
    search: Arc<dyn SimilaritySearch>,
    catalog: Arc<Catalog>,
}

impl RecommenderService {
    pub fn new(search: Arc<dyn SimilaritySearch>, catalog: Arc<Catalog>) -> Self {
        Self { search, catalog }
    }

    /// Returns up to `top_k` recommendations for a natural-language query,
    /// optionally restricted to books rated at least `min_rating`.
    ///
    /// `min_rating: None` disables the quality filter; `Some(0.0)` keeps it
    /// enabled with a threshold every book passes. Validation faults are
    /// returned as [`RecommenderError::InvalidInput`] before anything
    /// external is called; every other failure surfaces as
    /// [`RecommenderError::Internal`].
    pub async fn recommend(
        &self,
        query: &str,
        top_k: usize,
        min_rating: Option<f32>,
    ) -> Result<Vec<Recommendation>> {
        let query = validate_query(query)?;
        let top_k = validate_top_k(top_k, MAX_TOP_K)?;
        let min_rating = validate_rating(min_rating)?;

        info!("searching for '{query}' (top_k={top_k}, min_rating={min_rating:?})");
        let records = self
            .ranked_records(&query, top_k, min_rating)
            .await
            .map_err(RecommenderError::from_pipeline)?;

        Ok(records.into_iter().map(Recommendation::from).collect())
    }

    /// Same pipeline as [`recommend`] under the default quality threshold,
    /// reshaped into key-value records for callers that do not want a
    /// typed row.
    pub async fn recommend_as_records(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<serde_json::Value>> {
        let recommendations = self
            .recommend(query, top_k, Some(DEFAULT_MIN_RATING))
            .await?;
        recommendations
            .into_iter()
            .map(|recommendation| {
                serde_json::to_value(recommendation)
                    .map_err(|err| RecommenderError::from_pipeline(err.into()))
            })
            .collect()
    }

    /// Browse variant: fetch a larger unfiltered candidate pool, narrow it
    /// by category, and optionally reorder by emotional tone.
    ///
    /// Category filtering and tone sorting only apply when the catalog
    /// actually carries those columns; `"All"` means no category filter.
    pub async fn recommend_with_filters(
        &self,
        query: &str,
        category: Option<&str>,
        tone: Option<Tone>,
        initial_top_k: usize,
        final_top_k: usize,
    ) -> Result<Vec<BookDetails>> {
        let query = validate_query(query)?;
        let initial_top_k = validate_top_k(initial_top_k, MAX_TOP_K)?;
        let final_top_k = validate_top_k(final_top_k, MAX_TOP_K)?;

        let records = self
            .ranked_records(&query, initial_top_k, None)
            .await
            .map_err(RecommenderError::from_pipeline)?;

        let capabilities = self.catalog.capabilities();
        let mut picked: Vec<&BookRecord> = match category {
            Some(label) if label != "All" && capabilities.categories => records
                .into_iter()
                .filter(|record| record.simple_categories.as_deref() == Some(label))
                .take(final_top_k)
                .collect(),
            _ => records.into_iter().take(final_top_k).collect(),
        };

        if let Some(tone) = tone {
            if capabilities.emotions {
                let column = tone.emotion_column();
                // Stable sort: relevance order breaks ties between equal scores.
                picked.sort_by(|a, b| {
                    let left = a.emotion_score(column).unwrap_or(0.0);
                    let right = b.emotion_score(column).unwrap_or(0.0);
                    right.partial_cmp(&left).unwrap_or(std::cmp::Ordering::Equal)
                });
            }
        }

        Ok(picked.into_iter().map(BookDetails::from).collect())
    }

    /// The pipeline stages after validation. Returns catalog rows ordered
    /// by retrieval rank and truncated to `top_k`; empty-result conditions
    /// are not errors.
    async fn ranked_records(
        &self,
        query: &str,
        top_k: usize,
        min_rating: Option<f32>,
    ) -> anyhow::Result<Vec<&BookRecord>> {
        // Over-fetch only when the rating filter will thin the results.
        let fetch_k = if min_rating.is_some() {
            top_k * SEARCH_MULTIPLIER
        } else {
            top_k
        };

        let documents = self
            .search
            .similarity_search(query, fetch_k)
            .await
            .context("similarity search failed")?;
        if documents.is_empty() {
            warn!("no search results for query '{query}'");
            return Ok(Vec::new());
        }

        // First occurrence wins so the dedup keeps retrieval order.
        let mut seen = HashSet::new();
        let mut isbns = Vec::new();
        for document in &documents {
            if let Some(isbn) = parse_isbn13(&document.content) {
                if seen.insert(isbn) {
                    isbns.push(isbn);
                }
            }
        }
        if isbns.is_empty() {
            warn!("no valid ISBNs found in search results");
            return Ok(Vec::new());
        }
        debug!("extracted {} unique ISBN(s) from {} document(s)", isbns.len(), documents.len());

        // Walking the ISBNs in retrieval order keeps the survivors in
        // relevance order; identifiers the catalog does not know are
        // dropped, not errors.
        let mut records = Vec::new();
        for isbn in isbns {
            let Some(record) = self.catalog.get(isbn) else {
                continue;
            };
            if let Some(threshold) = min_rating {
                if record.average_rating < threshold {
                    continue;
                }
            }
            records.push(record);
            if records.len() == top_k {
                break;
            }
        }

        info!("returning {} recommendation(s)", records.len());
        Ok(records)
    }
}
