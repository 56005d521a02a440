use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use impostor::{
    api,
    config::ServerConfig,
    llm,
    state::{AppState, Session},
    words::{WordGenerator, WordResolver},
    ws,
};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "impostor=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting El Impostor...");

    let config = ServerConfig::from_env();

    // Initialize LLM providers for topic-based words
    let llm_config = llm::LlmConfig::from_env();
    let generator = match llm_config.build_manager() {
        Ok(manager) => {
            tracing::info!(
                "Word generation available via {:?}",
                manager.provider_names()
            );
            Some(WordGenerator::new(
                manager,
                llm_config.default_timeout,
                llm_config.default_max_tokens,
            ))
        }
        Err(e) => {
            tracing::warn!(
                "Failed to initialize LLM providers: {}. Generated words will not be available.",
                e
            );
            None
        }
    };

    let session = match config.seed {
        Some(seed) => {
            tracing::info!("Using fixed seed {}", seed);
            Session::with_seed(config.limits, seed)
        }
        None => Session::new(config.limits),
    };

    let state = Arc::new(AppState::new(session, WordResolver::new(generator)));

    let api_routes = Router::new()
        .route("/api/categories", get(api::list_categories))
        .route("/api/limits", get(api::get_limits))
        .route("/api/word-generation", get(api::word_generation));

    let app = Router::new()
        .route("/ws", get(ws::ws_handler))
        .merge(api_routes)
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!("Listening on http://{}", config.bind);

    let listener = tokio::net::TcpListener::bind(config.bind).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
