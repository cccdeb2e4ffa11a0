use anyhow::{anyhow, bail, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

const REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Client for the hosted sentence-embedding model.
///
/// The model itself is an external capability; this wrapper only turns
/// text into unit-length vectors over HTTP.
#[derive(Debug, Clone)]
pub struct SentenceEncoder {
    client: Client,
    api_key: String,
    model_url: String,
}

#[derive(Debug, Serialize)]
struct EncodeRequest {
    inputs: Vec<String>,
    options: Options,
}

#[derive(Debug, Serialize)]
struct Options {
    wait_for_model: bool,
    use_cache: bool,
}

#[derive(Debug, Deserialize)]
struct EncodeResponse(Vec<Vec<f32>>);

impl SentenceEncoder {
    pub fn new(base_url: &str, model_name: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()
            .context("failed to create HTTP client for the embedding API")?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model_url: format!("{}/models/{}", base_url.trim_end_matches('/'), model_name),
        })
    }

    /// Encodes a single text into a normalized embedding vector.
    pub async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.encode_batch(&[text.to_string()]).await?;
        embeddings
            .pop()
            .ok_or_else(|| anyhow!("embedding API returned no vectors"))
    }

    pub async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = EncodeRequest {
            inputs: texts.to_vec(),
            options: Options {
                wait_for_model: true,
                use_cache: true,
            },
        };

        debug!("encoding {} text(s) via {}", texts.len(), self.model_url);
        let response = self
            .client
            .post(&self.model_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .context("embedding API request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("embedding API error ({status}): {error_text}");
            bail!("embedding API returned {status}: {error_text}");
        }

        let embeddings: EncodeResponse = response
            .json()
            .await
            .context("failed to parse embedding API response")?;

        Ok(embeddings.0.iter().map(|v| normalize(v)).collect())
    }
}

/// Scales a vector to unit length; a zero vector comes back unchanged.
fn normalize(vector: &[f32]) -> Vec<f32> {
    let magnitude = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if magnitude > 0.0 {
        vector.iter().map(|x| x / magnitude).collect()
    } else {
        vector.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_produces_a_unit_vector() {
        let normalized = normalize(&[3.0, 4.0]);
        assert_eq!(normalized, vec![0.6, 0.8]);

        let magnitude: f32 = normalized.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_leaves_the_zero_vector_alone() {
        assert_eq!(normalize(&[0.0, 0.0, 0.0]), vec![0.0, 0.0, 0.0]);
    }
}
