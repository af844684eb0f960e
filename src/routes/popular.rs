use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{error::AppResult, models::PopularMovie, routes::AppState};

/// How many entries the ticker listing carries
const POPULAR_LIMIT: usize = 10;

#[derive(Debug, Serialize)]
pub struct PopularResponse {
    pub results: Vec<PopularEntry>,
}

#[derive(Debug, Serialize)]
pub struct PopularEntry {
    pub id: i64,
    pub title: String,
    pub release_date: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f64>,
    #[serde(rename = "trailerKey", skip_serializing_if = "Option::is_none")]
    pub trailer_key: Option<String>,
}

impl From<PopularMovie> for PopularEntry {
    fn from(popular: PopularMovie) -> Self {
        Self {
            id: popular.movie.id,
            title: popular.movie.title,
            release_date: popular.movie.release_date,
            overview: popular.movie.overview,
            poster_path: popular.movie.poster_path,
            backdrop_path: popular.movie.backdrop_path,
            vote_average: popular.movie.vote_average,
            trailer_key: popular.trailer_key,
        }
    }
}

/// Handler for the popular-movies ticker endpoint
pub async fn popular(State(state): State<Arc<AppState>>) -> AppResult<Json<PopularResponse>> {
    let movies = state.resolver.popular_movies(POPULAR_LIMIT).await?;

    Ok(Json(PopularResponse {
        results: movies.into_iter().map(PopularEntry::from).collect(),
    }))
}
