/// Outbound provider abstractions
///
/// This module provides a pluggable architecture for the two third-party
/// surfaces the service depends on: movie metadata (TMDB) and generative
/// suggestion text (Gemini). Keeping both behind traits lets the pipeline
/// be exercised without network access and lets the generative backend be
/// swapped through configuration alone.
use crate::{
    error::AppResult,
    models::{MovieSummary, ResolvedMovie},
};

#[cfg(test)]
use mockall::automock;

pub mod gemini;
pub mod tmdb;

/// Trait for movie metadata providers
///
/// Methods map one-to-one onto provider endpoints and return domain types;
/// raw wire formats never cross this boundary. All methods translate
/// provider failures into `AppError` values, never panics.
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Search movies by free-text title, optionally filtered by release year
    async fn search_movies(
        &self,
        query: &str,
        year: Option<&str>,
    ) -> AppResult<Vec<MovieSummary>>;

    /// Fetch full details for a movie id, including credits and trailers
    /// in a single composed call
    async fn movie_details(&self, id: i64) -> AppResult<ResolvedMovie>;

    /// Fetch the first page of popularity-ranked movies
    async fn popular_movies(&self) -> AppResult<Vec<MovieSummary>>;

    /// Fetch the provider's own "similar movies" listing for an id
    async fn similar_movies(&self, id: i64) -> AppResult<Vec<MovieSummary>>;

    /// Look up the first trailer reference for a movie id
    async fn trailer_key(&self, id: i64) -> AppResult<Option<String>>;

    /// Whether an API key is configured for this provider
    fn configured(&self) -> bool;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Trait for generative suggestion backends
///
/// A backend turns a prompt into raw text. It performs no validation or
/// parsing of the response and applies no fallback of its own; both belong
/// to the caller.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait SuggestionBackend: Send + Sync {
    /// Send a prompt and return the model's raw text response
    async fn generate(&self, prompt: &str) -> AppResult<String>;

    /// Whether the backend currently accepts the configured credentials
    async fn probe(&self) -> bool;

    /// Backend name for logging and debugging
    fn name(&self) -> &'static str;
}

#[cfg(test)]
pub mod testing {
    //! Canned-response provider for resolver and pipeline tests

    use std::collections::{HashMap, HashSet};

    use crate::error::{AppError, AppResult};
    use crate::models::{MovieSummary, ResolvedMovie};

    use super::MetadataProvider;

    /// Metadata provider backed by in-memory fixtures
    #[derive(Default)]
    pub struct StaticProvider {
        /// Search results keyed by lowercased query
        pub search_results: HashMap<String, Vec<MovieSummary>>,
        pub details: HashMap<i64, ResolvedMovie>,
        pub popular: Vec<MovieSummary>,
        pub similar: HashMap<i64, Vec<MovieSummary>>,
        pub trailers: HashMap<i64, String>,
        /// Ids whose detail fetch fails with an upstream error
        pub broken_details: HashSet<i64>,
        /// Ids whose trailer fetch fails with an upstream error
        pub broken_trailers: HashSet<i64>,
        /// When set, every search call fails with an upstream error
        pub broken_search: bool,
        pub key_configured: bool,
    }

    impl StaticProvider {
        pub fn new() -> Self {
            Self {
                key_configured: true,
                ..Self::default()
            }
        }

        pub fn with_movie(mut self, query: &str, movie: ResolvedMovie) -> Self {
            let summary = MovieSummary {
                id: movie.id,
                title: movie.title.clone(),
                original_title: movie.original_title.clone(),
                release_date: movie.release_date.clone(),
                overview: movie.overview.clone(),
                poster_path: movie.poster_path.clone(),
                backdrop_path: movie.backdrop_path.clone(),
                vote_average: movie.vote_average,
            };
            self.search_results
                .entry(query.to_lowercase())
                .or_default()
                .push(summary);
            self.details.insert(movie.id, movie);
            self
        }
    }

    #[async_trait::async_trait]
    impl MetadataProvider for StaticProvider {
        async fn search_movies(
            &self,
            query: &str,
            _year: Option<&str>,
        ) -> AppResult<Vec<MovieSummary>> {
            if self.broken_search {
                return Err(AppError::Upstream("search unavailable".to_string()));
            }
            Ok(self
                .search_results
                .get(&query.trim().to_lowercase())
                .cloned()
                .unwrap_or_default())
        }

        async fn movie_details(&self, id: i64) -> AppResult<ResolvedMovie> {
            if self.broken_details.contains(&id) {
                return Err(AppError::Upstream(format!(
                    "detail fetch failed for movie {id}"
                )));
            }
            self.details
                .get(&id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("Movie not found: {id}")))
        }

        async fn popular_movies(&self) -> AppResult<Vec<MovieSummary>> {
            Ok(self.popular.clone())
        }

        async fn similar_movies(&self, id: i64) -> AppResult<Vec<MovieSummary>> {
            self.similar
                .get(&id)
                .cloned()
                .ok_or_else(|| AppError::Upstream("similar listing unavailable".to_string()))
        }

        async fn trailer_key(&self, id: i64) -> AppResult<Option<String>> {
            if self.broken_trailers.contains(&id) {
                return Err(AppError::Upstream(format!(
                    "video fetch failed for movie {id}"
                )));
            }
            Ok(self.trailers.get(&id).cloned())
        }

        fn configured(&self) -> bool {
            self.key_configured
        }

        fn name(&self) -> &'static str {
            "static"
        }
    }
}
