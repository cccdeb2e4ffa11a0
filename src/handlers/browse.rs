use crate::{
    catalog::Catalog,
    error::RecommenderError,
    models::{BrowseOptionsResponse, BrowseRequest, BrowseResponse, Tone},
    services::RecommenderService,
};
use actix_web::{
    web::{self, Json},
    HttpResponse,
};

pub fn browse_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/browse").route(web::post().to(browse)));
    cfg.service(web::resource("/browse/options").route(web::get().to(browse_options)));
}

/// Category- and tone-aware browsing over the recommendation pipeline.
pub async fn browse(
    request: Json<BrowseRequest>,
    recommender: web::Data<RecommenderService>,
) -> Result<HttpResponse, RecommenderError> {
    let books = recommender
        .recommend_with_filters(
            &request.query,
            request.category.as_deref(),
            request.tone,
            request.initial_top_k,
            request.final_top_k,
        )
        .await?;

    Ok(HttpResponse::Ok().json(BrowseResponse { books }))
}

/// Dropdown values for the browse surface, driven by what the loaded
/// catalog actually supports.
pub async fn browse_options(catalog: web::Data<Catalog>) -> HttpResponse {
    let capabilities = catalog.capabilities();

    let mut categories = vec!["All".to_string()];
    if capabilities.categories {
        categories.extend(catalog.categories());
    }

    let mut tones = vec!["All".to_string()];
    if capabilities.emotions {
        tones.extend(Tone::ALL.iter().map(|tone| tone.label().to_string()));
    }

    HttpResponse::Ok().json(BrowseOptionsResponse { categories, tones })
}
