use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::routes::AppState;

/// Health of the two upstream credentials.
///
/// Field names are part of the legacy wire contract and stay fixed even
/// when another generative backend is configured.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(rename = "geminiApiValid")]
    pub gemini_api_valid: bool,
    #[serde(rename = "tmdbApiValid")]
    pub tmdb_api_valid: bool,
}

/// Handler for the API status endpoint.
///
/// The generative key is probed live against the backend; the metadata key
/// is only checked for presence.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let gemini_api_valid = state.generator.probe().await;
    let tmdb_api_valid = state.resolver.configured();

    Json(StatusResponse {
        status: "ok",
        gemini_api_valid,
        tmdb_api_valid,
    })
}
