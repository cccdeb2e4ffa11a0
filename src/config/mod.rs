use anyhow::{Context, Result};
use dotenv::dotenv;
use std::env;

const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
const DEFAULT_HUGGINGFACE_BASE_URL: &str = "https://api-inference.huggingface.co";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub books_csv: String,
    pub chroma_url: String,
    pub chroma_collection: String,
    pub huggingface_api_key: String,
    pub huggingface_base_url: String,
    pub embedding_model: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Config {
            // Localhost by default; deployments opt into wider binds.
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            books_csv: env::var("BOOKS_CSV").unwrap_or_else(|_| "books_cleaned.csv".to_string()),
            chroma_url: env::var("CHROMA_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string()),
            chroma_collection: env::var("CHROMA_COLLECTION")
                .unwrap_or_else(|_| "book_recommendations".to_string()),
            huggingface_api_key: env::var("HUGGINGFACE_API_KEY")
                .context("HUGGINGFACE_API_KEY must be set")?,
            huggingface_base_url: env::var("HUGGINGFACE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_HUGGINGFACE_BASE_URL.to_string()),
            embedding_model: env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string()),
        })
    }
}
