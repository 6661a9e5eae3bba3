use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use feed_profile::config::Settings;
use feed_profile::core::{LookupTables, ProfileEngine, StatisticalExtractor};
use feed_profile::routes::{self, AppState};
use feed_profile::services::{CachedExpander, DisabledExpander, Expander, ExpansionClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match format {
        "pretty" => subscriber.pretty().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.json().init(),
    }
}

/// Build the expansion collaborator, or a disabled one when no credential is set
fn build_expander(settings: &Settings) -> Arc<dyn Expander> {
    let expansion = &settings.expansion;

    if !expansion.is_configured() {
        warn!("No expansion credential configured, keyword expansion disabled");
        return Arc::new(DisabledExpander);
    }

    let client = match ExpansionClient::new(
        expansion.endpoint.clone(),
        expansion.api_key.clone(),
        expansion.model.clone(),
        Duration::from_secs(expansion.timeout_secs),
        expansion.max_suggestions,
    ) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create expansion client ({}), keyword expansion disabled", e);
            return Arc::new(DisabledExpander);
        }
    };

    info!("Expansion client initialized (model: {}, timeout: {}s)", expansion.model, expansion.timeout_secs);

    if expansion.cache_ttl_secs == 0 {
        return Arc::new(client);
    }

    info!(
        "Expansion cache enabled ({} entries, TTL: {}s)",
        expansion.cache_capacity, expansion.cache_ttl_secs
    );
    Arc::new(CachedExpander::new(
        Arc::new(client),
        expansion.cache_capacity,
        Duration::from_secs(expansion.cache_ttl_secs),
    ))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting feed profile service...");

    let tables = match &settings.tables.path {
        Some(path) => LookupTables::load_from(path).map_err(|e| {
            error!("Failed to load lookup tables from {}: {}", path, e);
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?,
        None => LookupTables::builtin(),
    };

    info!(
        "Lookup tables loaded ({} cities, {} source groups)",
        tables.geo.len(),
        tables.sources.len()
    );

    let engine = ProfileEngine::new(
        settings.weights.rules(),
        settings.profile.defaults(),
        Arc::new(tables),
        build_expander(&settings),
        settings.expansion.policy(),
    );

    let app_state = AppState {
        engine,
        extractor: Arc::new(StatisticalExtractor::new()),
        extraction: settings.extraction.params(),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
