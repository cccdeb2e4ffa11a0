use anyhow::Result;
use book_recommender_api::{
    catalog::Catalog,
    config::Config,
    models::{format_authors, Recommendation},
    services::{
        ChromaClient, RecommenderService, SentenceEncoder, SimilaritySearch, VectorSearch,
        DEFAULT_MIN_RATING,
    },
};
use clap::{Parser, ValueEnum};
use console::style;
use std::io;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const TITLE_WIDTH: usize = 44;
const AUTHORS_WIDTH: usize = 30;

/// Semantic book recommender - find books from a natural-language description
#[derive(Parser)]
#[command(name = "recommend", version, about)]
struct Cli {
    /// Natural language search query
    query: String,

    /// Number of recommendations
    #[arg(short = 'k', long = "top", default_value_t = 10)]
    top: usize,

    /// Minimum average rating
    #[arg(short = 'r', long = "min-rating", default_value_t = DEFAULT_MIN_RATING)]
    min_rating: f32,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr so piped output stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    eprintln!("Initializing recommender system...");
    let catalog = Arc::new(Catalog::load(&config.books_csv)?);
    let encoder = SentenceEncoder::new(
        &config.huggingface_base_url,
        &config.embedding_model,
        &config.huggingface_api_key,
    )?;
    let store = ChromaClient::connect(&config.chroma_url, &config.chroma_collection).await?;
    let search: Arc<dyn SimilaritySearch> = Arc::new(VectorSearch::new(encoder, store));
    let recommender = RecommenderService::new(search, catalog);
    eprintln!("Ready!");

    let results = recommender
        .recommend(&cli.query, cli.top, Some(cli.min_rating))
        .await?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Csv => write_csv(&results)?,
        OutputFormat::Table => {
            println!("\nQuery: '{}'\n", cli.query);
            print_table(&results);
            println!("\nFound {} recommendations", results.len());
        }
    }

    Ok(())
}

fn write_csv(results: &[Recommendation]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    for recommendation in results {
        writer.serialize(recommendation)?;
    }
    writer.flush()?;
    Ok(())
}

fn print_table(results: &[Recommendation]) {
    if results.is_empty() {
        println!("No recommendations found.");
        return;
    }

    let headers = ["Title", "Authors", "Rating", "Pages", "Year", "ISBN-13"];
    let rows: Vec<[String; 6]> = results
        .iter()
        .map(|r| {
            [
                clip(&r.title, TITLE_WIDTH),
                clip(&format_authors(&r.authors), AUTHORS_WIDTH),
                format!("{:.2}", r.average_rating),
                r.num_pages.map_or_else(String::new, |pages| pages.to_string()),
                r.published_year.map_or_else(String::new, |year| year.to_string()),
                r.isbn13.to_string(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (column, cell) in row.iter().enumerate() {
            widths[column] = widths[column].max(cell.chars().count());
        }
    }

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, &width)| format!("{header:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", style(header_line.trim_end()).bold());
    println!(
        "{}",
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  ")
    );

    for row in &rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{}", line.trim_end());
    }
}

fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(max - 3).collect();
    clipped.push_str("...");
    clipped
}
