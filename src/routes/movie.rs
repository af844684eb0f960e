use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::{error::AppResult, models::ResolvedMovie, routes::AppState};

/// Flattened detail record for one movie.
///
/// `genre_ids` carries human-readable genre names; the field name is part
/// of the legacy wire contract.
#[derive(Debug, Serialize)]
pub struct MovieDetailResponse {
    pub id: i64,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    pub runtime: Option<u32>,
    pub genre_ids: Vec<String>,
    pub director: String,
    pub cast: Vec<String>,
    #[serde(rename = "trailerKey", skip_serializing_if = "Option::is_none")]
    pub trailer_key: Option<String>,
}

impl From<ResolvedMovie> for MovieDetailResponse {
    fn from(movie: ResolvedMovie) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            poster_path: movie.poster_path,
            backdrop_path: movie.backdrop_path,
            overview: movie.overview,
            release_date: movie.release_date,
            vote_average: movie.vote_average,
            runtime: movie.runtime,
            genre_ids: movie.genres,
            director: movie.director.unwrap_or_else(|| "Unknown".to_string()),
            cast: movie.cast,
            trailer_key: movie.trailer_key,
        }
    }
}

/// Handler for the movie-details endpoint
pub async fn movie_details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<MovieDetailResponse>> {
    let movie = state.resolver.resolve_by_id(id).await?;
    Ok(Json(MovieDetailResponse::from(movie)))
}
