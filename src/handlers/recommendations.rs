use crate::{
    error::RecommenderError,
    models::{RecommendationRequest, RecommendationResponse, SearchParams},
    services::RecommenderService,
};
use actix_web::{
    get,
    web::{self, Json},
    HttpResponse,
};

pub fn recommendations_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/recommendations").route(web::post().to(get_recommendations)));
}

/// Get book recommendations for a natural-language query, with an optional
/// minimum-rating filter.
pub async fn get_recommendations(
    request: Json<RecommendationRequest>,
    recommender: web::Data<RecommenderService>,
) -> Result<HttpResponse, RecommenderError> {
    let recommendations = recommender
        .recommend(&request.query, request.top_k, request.min_rating)
        .await?;

    Ok(HttpResponse::Ok().json(RecommendationResponse { recommendations }))
}

/// Plain-record variant of the recommendation pipeline for simpler callers.
#[get("/search")]
pub async fn search(
    params: web::Query<SearchParams>,
    recommender: web::Data<RecommenderService>,
) -> Result<HttpResponse, RecommenderError> {
    let results = recommender
        .recommend_as_records(&params.query, params.top_k)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "results": results,
    })))
}
