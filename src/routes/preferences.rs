use actix_web::{web, HttpResponse, Responder};
use serde_json::Value;
use validator::Validate;
use crate::core::{ExtractionParams, KeywordExtractor, ProfileEngine, ProfileError};
use crate::models::domain::round2;
use crate::models::{ErrorResponse, ExtractedKeyword, GenerateKeywordsRequest, GenerateKeywordsResponse, HealthResponse};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: ProfileEngine,
    pub extractor: Arc<dyn KeywordExtractor>,
    pub extraction: ExtractionParams,
}

/// Configure all preference-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/preferences", web::post().to(build_preferences))
        .route("/keywords/generate", web::post().to(generate_keywords));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let expansion = if state.engine.expansion_enabled() { "enabled" } else { "disabled" };

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        expansion: expansion.to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Build a preference profile from survey answers
///
/// POST /api/v1/preferences
///
/// Request body: survey answers keyed by question id, e.g.
/// ```json
/// {"7": ["AI"], "5": {"Finance": 1, "Sports": 3}, "14": "Engineer", "16": "Ahmedabad"}
/// ```
async fn build_preferences(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ProfileError> {
    let request_id = uuid::Uuid::new_v4();

    tracing::info!(%request_id, "Building preference profile");

    match state.engine.build_profile(&body).await {
        Ok(profile) => {
            tracing::info!(
                %request_id,
                keywords = profile.keywords.len(),
                "Returning preference profile"
            );
            Ok(HttpResponse::Ok().json(profile))
        }
        Err(e) => {
            if e.is_client_error() {
                tracing::info!(%request_id, error = %e, "Rejected survey payload");
            }
            Err(e)
        }
    }
}

/// Extract keyphrases from the combined survey answers
///
/// POST /api/v1/keywords/generate
async fn generate_keywords(
    state: web::Data<AppState>,
    req: web::Json<GenerateKeywordsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for generate_keywords request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse::new(format!("Validation failed: {}", errors)));
    }

    let mut params = state.extraction;
    if let Some(top_n) = req.top_n {
        params.top_n = top_n;
    }
    if let Some(diversity) = req.diversity {
        params.diversity = diversity;
    }

    let text = req.combined_text();
    let chars = text.len();
    let extractor = Arc::clone(&state.extractor);

    // Selection is CPU-bound; keep it off the async worker
    let extracted = match web::block(move || extractor.extract_keywords(&text, &params)).await {
        Ok(extracted) => extracted,
        Err(e) => {
            tracing::error!("Keyword extraction task failed: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse::new("Failed to extract keywords."));
        }
    };

    let keywords: Vec<ExtractedKeyword> = extracted
        .into_iter()
        .map(|(keyword, score)| ExtractedKeyword {
            keyword,
            weight: round2(score),
        })
        .collect();

    tracing::debug!("Extracted {} keywords from {} chars", keywords.len(), chars);

    HttpResponse::Ok().json(GenerateKeywordsResponse { keywords })
}
