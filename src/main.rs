use std::sync::Arc;

use anyhow::bail;
use tracing_subscriber::EnvFilter;

use cinematch_api::{
    config::Config,
    routes::{create_router, AppState},
    services::{
        generator::SuggestionGenerator,
        pipeline::SuggestionPipeline,
        providers::{gemini::GeminiBackend, tmdb::TmdbProvider, SuggestionBackend},
        resolver::MovieResolver,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!(
        tmdb_key = if config.tmdb_api_key.is_some() { "set" } else { "missing" },
        gemini_key = if config.gemini_api_key.is_some() { "set" } else { "missing" },
        backend = %config.suggestion_backend,
        "Starting with configuration"
    );

    let metadata = Arc::new(TmdbProvider::new(&config)?);
    let backend: Arc<dyn SuggestionBackend> = match config.suggestion_backend.as_str() {
        "gemini" => Arc::new(GeminiBackend::new(&config)?),
        other => bail!("Unknown suggestion backend: {}", other),
    };

    let resolver = MovieResolver::new(metadata);
    let generator = Arc::new(SuggestionGenerator::new(backend));
    let pipeline = SuggestionPipeline::new(resolver.clone(), Arc::clone(&generator));

    let state = Arc::new(AppState {
        resolver,
        generator,
        pipeline,
    });

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
