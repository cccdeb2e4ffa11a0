use crate::models::{BookDetails, Recommendation, Tone};
use serde::{Deserialize, Serialize};

/// Request body for book recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    /// The search query or description to find book recommendations
    pub query: String,
    /// Number of recommendations to return (default: 10)
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Minimum average rating; omit to disable the quality filter
    #[serde(default)]
    pub min_rating: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<Recommendation>,
}

/// Query parameters for the plain-record search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    pub query: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// Request body for category/tone-aware browsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseRequest {
    pub query: String,
    /// Category label; omit or pass "All" to skip category filtering
    #[serde(default)]
    pub category: Option<String>,
    /// Emotional tone to sort by; omit to keep relevance order
    #[serde(default)]
    pub tone: Option<Tone>,
    /// Candidate pool fetched before category filtering (default: 50)
    #[serde(default = "default_initial_top_k")]
    pub initial_top_k: usize,
    /// Number of books returned (default: 16)
    #[serde(default = "default_final_top_k")]
    pub final_top_k: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseResponse {
    pub books: Vec<BookDetails>,
}

/// Dropdown values the catalog supports, resolved from its capability
/// flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseOptionsResponse {
    pub categories: Vec<String>,
    pub tones: Vec<String>,
}

fn default_top_k() -> usize {
    10
}

fn default_initial_top_k() -> usize {
    50
}

fn default_final_top_k() -> usize {
    16
}
