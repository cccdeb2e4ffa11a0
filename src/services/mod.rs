pub mod chroma;
pub mod recommender;
pub mod sentence_encoder;
pub mod vector_search;

// Re-export public types
pub use chroma::ChromaClient;
pub use recommender::{RecommenderService, DEFAULT_MIN_RATING, SEARCH_MULTIPLIER};
pub use sentence_encoder::SentenceEncoder;
pub use vector_search::{RetrievedDocument, SimilaritySearch, VectorSearch};
