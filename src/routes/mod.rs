// Route exports
pub mod preferences;

use crate::models::ErrorResponse;
use actix_web::{error, web, HttpResponse};

pub use preferences::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(preferences::configure),
    );
}

/// JSON extractor config mapping unparsable bodies to a 400 `Invalid JSON input`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        tracing::info!("JSON payload error on {}: {}", req.path(), err);
        error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(ErrorResponse::new("Invalid JSON input")),
        )
        .into()
    })
}
