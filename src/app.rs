use crate::{
    catalog::Catalog,
    config::Config,
    error::Result,
    routes::api_routes,
    services::{ChromaClient, RecommenderService, SentenceEncoder, SimilaritySearch, VectorSearch},
};
use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use log::info;
use std::net::TcpListener;
use std::sync::Arc;

pub struct Application {
    port: u16,
    host: String,
    config: Config,
}

impl Application {
    /// Create a new application instance
    pub fn new(config: &Config) -> Self {
        Self {
            port: config.port,
            host: config.host.clone(),
            config: config.clone(),
        }
    }

    /// Build and run the server
    pub async fn run(&self) -> Result<()> {
        let bind_address = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind(&bind_address)?;
        info!("Starting server at http://{}:{}", self.host, self.port);

        self.run_with_listener(listener).await
    }

    /// Run the server with a specific TCP listener
    /// This is useful for testing where we want to use a random port
    pub async fn run_with_listener(&self, listener: TcpListener) -> Result<()> {
        // The catalog is loaded once here and shared read-only with every
        // request handler.
        let catalog = Arc::new(
            Catalog::load(&self.config.books_csv).context("Failed to load book catalog")?,
        );

        let encoder = SentenceEncoder::new(
            &self.config.huggingface_base_url,
            &self.config.embedding_model,
            &self.config.huggingface_api_key,
        )
        .context("Failed to initialize sentence encoder")?;

        let store = ChromaClient::connect(&self.config.chroma_url, &self.config.chroma_collection)
            .await
            .context("Failed to connect to the vector store")?;

        let search: Arc<dyn SimilaritySearch> = Arc::new(VectorSearch::new(encoder, store));
        let recommender = web::Data::new(RecommenderService::new(search, catalog.clone()));
        let catalog = web::Data::from(catalog);

        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header();

            App::new()
                .wrap(cors)
                .wrap(Logger::default())
                .app_data(recommender.clone())
                .app_data(catalog.clone())
                .service(api_routes())
        })
        .listen(listener)?
        .run()
        .await?;

        Ok(())
    }
}
