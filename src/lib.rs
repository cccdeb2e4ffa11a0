pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod isbn;
pub mod models;
pub mod routes;
pub mod services;
pub mod validation;

pub use catalog::{BookRecord, Catalog};
pub use config::Config;
pub use error::{RecommenderError, Result};
pub use services::RecommenderService;
