use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::SuggestionResult,
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub title: Option<String>,
    /// Legacy clients send the title under `movie`
    pub movie: Option<String>,
    pub year: Option<String>,
}

/// Handler for the suggestion endpoint
pub async fn suggest(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<SuggestRequest>,
) -> AppResult<Json<SuggestionResult>> {
    let title = request
        .title
        .or(request.movie)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Movie title is required".to_string()))?;

    let year = request
        .year
        .as_deref()
        .map(str::trim)
        .filter(|y| !y.is_empty());

    tracing::info!(
        request_id = %request_id,
        title = %title,
        year = year.unwrap_or("N/A"),
        "Processing suggestion request"
    );

    let result = state.pipeline.suggest(&title, year).await?;

    tracing::info!(
        request_id = %request_id,
        suggestions = result.suggestions.len(),
        failed = result
            .failed_suggestions
            .as_ref()
            .map_or(0, |failed| failed.len()),
        "Suggestion request completed"
    );

    Ok(Json(result))
}
