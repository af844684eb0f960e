use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{generator::SuggestionGenerator, pipeline::SuggestionPipeline, resolver::MovieResolver},
};

pub mod movie;
pub mod popular;
pub mod status;
pub mod suggest;

/// Shared application state, constructed once at startup and read-only
/// thereafter
pub struct AppState {
    pub resolver: MovieResolver,
    pub generator: Arc<SuggestionGenerator>,
    pub pipeline: SuggestionPipeline,
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/status", get(status::status))
        .route("/popular", get(popular::popular))
        .route("/movie/:id", get(movie::movie_details))
        .route("/suggest", post(suggest::suggest))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
