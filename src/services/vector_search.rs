use crate::services::{ChromaClient, SentenceEncoder};
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

/// One hit from the nearest-neighbor index: the tagged document text and,
/// when the store reports one, its distance from the query.
#[derive(Debug, Clone)]
pub struct RetrievedDocument {
    pub content: String,
    pub distance: Option<f32>,
}

/// The nearest-neighbor search capability the recommender consumes.
///
/// Implementations return at most `k` documents ordered by descending
/// relevance, and must be safe to share across request handlers.
#[async_trait]
pub trait SimilaritySearch: Send + Sync {
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<RetrievedDocument>>;
}

/// Embeds the query text and runs it against the vector store.
pub struct VectorSearch {
    encoder: SentenceEncoder,
    store: ChromaClient,
}

impl VectorSearch {
    pub fn new(encoder: SentenceEncoder, store: ChromaClient) -> Self {
        Self { encoder, store }
    }
}

#[async_trait]
impl SimilaritySearch for VectorSearch {
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<RetrievedDocument>> {
        let embedding = self
            .encoder
            .encode(query)
            .await
            .context("failed to embed query")?;
        debug!("embedded query into {} dimensions", embedding.len());

        self.store
            .query(&embedding, k)
            .await
            .context("vector store search failed")
    }
}
