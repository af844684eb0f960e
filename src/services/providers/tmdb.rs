/// TMDB API provider
///
/// Provides title search, detail lookups, popular listings and similar-movie
/// listings against The Movie Database v3 API.
///
/// API Flow:
/// 1. Search: /search/movie → candidate summaries for disambiguation
/// 2. Details: /movie/{id}?append_to_response=credits,videos → one composed
///    call carrying genres, runtime, credits and trailer listings
/// 3. Listings: /movie/popular and /movie/{id}/similar
use std::time::Duration;

use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{
        tmdb::{TmdbListResponse, TmdbMovieDetails, TmdbVideoList},
        MovieSummary, ResolvedMovie,
    },
    services::providers::MetadataProvider,
};

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
}

impl TmdbProvider {
    /// Creates a TMDB provider with a request timeout on every outbound call
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            api_key: config.tmdb_api_key.clone(),
            api_url: config.tmdb_api_url.clone(),
        })
    }

    fn api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::Upstream("TMDB API key is not configured".to_string()))
    }

    /// Issues a GET request and deserializes the JSON body.
    ///
    /// A provider 404 maps to `NotFound`; any other non-success status maps
    /// to `Upstream` with the response body attached.
    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> AppResult<T> {
        let api_key = self.api_key()?;
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", api_key)])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound("Movie not found".to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %path,
                "Failed to deserialize TMDB response"
            );
            AppError::Upstream(format!("Failed to parse TMDB response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn search_movies(
        &self,
        query: &str,
        year: Option<&str>,
    ) -> AppResult<Vec<MovieSummary>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let mut params = vec![("query", query), ("include_adult", "false")];
        if let Some(year) = year {
            params.push(("year", year));
        }

        let response: TmdbListResponse = self.fetch("/search/movie", &params).await?;
        let results: Vec<MovieSummary> =
            response.results.into_iter().map(MovieSummary::from).collect();

        tracing::info!(
            query = %query,
            results = results.len(),
            provider = "tmdb",
            "Title search completed"
        );

        Ok(results)
    }

    async fn movie_details(&self, id: i64) -> AppResult<ResolvedMovie> {
        let details: TmdbMovieDetails = self
            .fetch(
                &format!("/movie/{}", id),
                &[("append_to_response", "credits,videos")],
            )
            .await?;

        tracing::debug!(id = id, title = %details.title, "Movie details fetched");

        Ok(details.into())
    }

    async fn popular_movies(&self) -> AppResult<Vec<MovieSummary>> {
        let response: TmdbListResponse = self
            .fetch("/movie/popular", &[("language", "en-US"), ("page", "1")])
            .await?;

        Ok(response.results.into_iter().map(MovieSummary::from).collect())
    }

    async fn similar_movies(&self, id: i64) -> AppResult<Vec<MovieSummary>> {
        let response: TmdbListResponse =
            self.fetch(&format!("/movie/{}/similar", id), &[]).await?;

        Ok(response.results.into_iter().map(MovieSummary::from).collect())
    }

    async fn trailer_key(&self, id: i64) -> AppResult<Option<String>> {
        let videos: TmdbVideoList = self.fetch(&format!("/movie/{}/videos", id), &[]).await?;

        Ok(crate::models::tmdb::first_trailer_key(&videos.results))
    }

    fn configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
