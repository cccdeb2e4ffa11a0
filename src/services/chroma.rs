use crate::services::vector_search::RetrievedDocument;
use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

const REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// HTTP client for the Chroma vector store.
///
/// Only querying is implemented; building and persisting the index happens
/// outside this system.
#[derive(Debug, Clone)]
pub struct ChromaClient {
    client: Client,
    base_url: String,
    collection_id: String,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query_embeddings: Vec<&'a [f32]>,
    n_results: usize,
    include: Vec<&'static str>,
}

// Chroma nests every field one level deep: one inner list per query
// embedding, and a missing document slot comes back as null.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    ids: Vec<Vec<String>>,
    #[serde(default)]
    documents: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    distances: Option<Vec<Vec<f32>>>,
}

#[derive(Debug, Deserialize)]
struct CollectionInfo {
    id: String,
    name: String,
}

impl ChromaClient {
    /// Connects to the store and resolves the collection id by name.
    pub async fn connect(base_url: &str, collection: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()
            .context("failed to create HTTP client for the vector store")?;

        let base_url = base_url.trim_end_matches('/').to_string();
        let response = client
            .get(format!("{base_url}/api/v1/collections/{collection}"))
            .send()
            .await
            .context("failed to reach the vector store")?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            bail!("vector store collection lookup failed: {error_text}");
        }

        let info: CollectionInfo = response
            .json()
            .await
            .context("failed to parse vector store collection info")?;
        info!("connected to vector store collection '{}' ({})", info.name, info.id);

        Ok(Self {
            client,
            base_url,
            collection_id: info.id,
        })
    }

    /// Runs a nearest-neighbor query, returning up to `n_results` documents
    /// ordered by descending relevance.
    pub async fn query(&self, embedding: &[f32], n_results: usize) -> Result<Vec<RetrievedDocument>> {
        let request = QueryRequest {
            query_embeddings: vec![embedding],
            n_results,
            include: vec!["documents", "distances"],
        };

        let response = self
            .client
            .post(format!(
                "{}/api/v1/collections/{}/query",
                self.base_url, self.collection_id
            ))
            .json(&request)
            .send()
            .await
            .context("vector store query request failed")?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            bail!("vector store query failed: {error_text}");
        }

        let body: QueryResponse = response
            .json()
            .await
            .context("failed to parse vector store query response")?;

        let documents = flatten(body);
        debug!("vector store returned {} document(s)", documents.len());
        Ok(documents)
    }

}

// Pairs the first batch of documents with their distances, skipping null
// document slots.
fn flatten(body: QueryResponse) -> Vec<RetrievedDocument> {
    let count = body.ids.first().map_or(0, Vec::len);
    let documents = body
        .documents
        .and_then(|mut batches| batches.drain(..).next())
        .unwrap_or_default();
    let distances = body
        .distances
        .and_then(|mut batches| batches.drain(..).next())
        .unwrap_or_default();

    (0..count)
        .filter_map(|position| {
            let content = documents.get(position).cloned().flatten()?;
            Some(RetrievedDocument {
                content,
                distance: distances.get(position).copied(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> QueryResponse {
        serde_json::from_str(json).expect("valid query response")
    }

    #[test]
    fn flatten_pairs_documents_with_distances() {
        let body = parse(
            r#"{
                "ids": [["a", "b"]],
                "documents": [["9780000000001 first", "9780000000002 second"]],
                "distances": [[0.12, 0.48]]
            }"#,
        );

        let documents = flatten(body);
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].content, "9780000000001 first");
        assert_eq!(documents[0].distance, Some(0.12));
        assert_eq!(documents[1].distance, Some(0.48));
    }

    #[test]
    fn flatten_skips_null_document_slots() {
        let body = parse(
            r#"{
                "ids": [["a", "b"]],
                "documents": [[null, "9780000000002 second"]],
                "distances": [[0.12, 0.48]]
            }"#,
        );

        let documents = flatten(body);
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].content, "9780000000002 second");
    }

    #[test]
    fn flatten_handles_missing_optional_sections() {
        let body = parse(r#"{"ids": [["a"]]}"#);
        assert!(flatten(body).is_empty());
    }
}
