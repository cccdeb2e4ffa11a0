use actix_web::{web, Scope};

use crate::handlers::{browse_config, health_check, recommendations_config, search};

/// Configure all routes for the API
pub fn api_routes() -> Scope {
    web::scope("/api")
        .service(health_check)
        .service(search)
        .configure(recommendations_config)
        .configure(browse_config)
}
