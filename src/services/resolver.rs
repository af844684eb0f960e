use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::{
    error::{AppError, AppResult},
    models::{MovieSummary, PopularMovie, ResolvedMovie},
    services::providers::MetadataProvider,
};

/// Upper bound on concurrent per-item provider lookups
const MAX_CONCURRENT_LOOKUPS: usize = 5;

/// Famous titles whose bare names match a pile of sequels and remakes.
/// Resolved directly by id instead of through search so a query for
/// "matrix" never lands on a spin-off. Quality tuning only; everything
/// else goes through the regular search path.
const PINNED_TITLES: &[(&str, i64)] = &[
    ("matrix", 603),
    ("the matrix", 603),
    ("star wars", 11),
    ("lord of the rings", 120),
    ("godfather", 238),
    ("inception", 27205),
    ("pulp fiction", 680),
    ("fight club", 550),
];

/// Resolves titles and ids against the metadata provider.
///
/// Owns the disambiguation policy; the provider itself stays a thin
/// endpoint wrapper.
#[derive(Clone)]
pub struct MovieResolver {
    provider: Arc<dyn MetadataProvider>,
}

impl MovieResolver {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self { provider }
    }

    /// Resolves a free-text title (and optional release year) to a fully
    /// detailed movie.
    ///
    /// Candidate preference: pinned id for famous ambiguous titles, then
    /// case-insensitive exact title match narrowed by year when possible,
    /// then the provider's first result. An empty result set or a failing
    /// search resolves to `NotFound`; only the detail fetch keeps its own
    /// error so callers can tell a missing movie from a broken upstream.
    pub async fn resolve_by_title(
        &self,
        title: &str,
        year: Option<&str>,
    ) -> AppResult<ResolvedMovie> {
        let query = title.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Movie title is required".to_string(),
            ));
        }

        if let Some(id) = pinned_title_id(query) {
            tracing::debug!(query = %query, id = id, "Resolving pinned title directly by id");
            return self.resolve_by_id(id).await;
        }

        let results = match self.provider.search_movies(query, year).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "Title search failed");
                return Err(AppError::NotFound(format!("Movie not found: {}", query)));
            }
        };

        let candidate = pick_candidate(query, year, &results)
            .ok_or_else(|| AppError::NotFound(format!("Movie not found: {}", query)))?;

        tracing::debug!(
            query = %query,
            matched = %candidate.title,
            matched_year = candidate.release_year().unwrap_or("N/A"),
            "Search candidate selected"
        );

        self.resolve_by_id(candidate.id).await
    }

    /// Fetches full details for a known movie id
    pub async fn resolve_by_id(&self, id: i64) -> AppResult<ResolvedMovie> {
        self.provider.movie_details(id).await
    }

    /// Fetches the popularity-ranked listing, truncated to `limit`, with
    /// each entry best-effort augmented by a trailer reference.
    ///
    /// Trailer lookups fan out concurrently; a failed lookup leaves that
    /// entry without a trailer and never disturbs its siblings or the
    /// listing order.
    pub async fn popular_movies(&self, limit: usize) -> AppResult<Vec<PopularMovie>> {
        let page = self.provider.popular_movies().await?;
        let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_LOOKUPS));

        let mut tasks = Vec::new();
        for movie in page.into_iter().take(limit) {
            let provider = Arc::clone(&self.provider);
            let semaphore = Arc::clone(&semaphore);
            tasks.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return PopularMovie { movie, trailer_key: None },
                };
                let trailer_key = match provider.trailer_key(movie.id).await {
                    Ok(key) => key,
                    Err(e) => {
                        tracing::debug!(
                            movie_id = movie.id,
                            error = %e,
                            "Trailer lookup failed for popular movie"
                        );
                        None
                    }
                };
                PopularMovie { movie, trailer_key }
            }));
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(popular) => results.push(popular),
                Err(e) => {
                    tracing::error!(error = %e, "Task join error");
                }
            }
        }

        tracing::info!(count = results.len(), "Popular movies fetched");

        Ok(results)
    }

    /// Passthrough to the provider's similar-movies listing
    pub async fn similar_movies(&self, id: i64) -> AppResult<Vec<MovieSummary>> {
        self.provider.similar_movies(id).await
    }

    /// Whether the underlying provider has credentials configured
    pub fn configured(&self) -> bool {
        self.provider.configured()
    }
}

fn pinned_title_id(query: &str) -> Option<i64> {
    let query = query.to_lowercase();
    PINNED_TITLES
        .iter()
        .find(|(title, _)| *title == query)
        .map(|(_, id)| *id)
}

/// Applies the disambiguation policy to a provider result set
fn pick_candidate<'a>(
    query: &str,
    year: Option<&str>,
    results: &'a [MovieSummary],
) -> Option<&'a MovieSummary> {
    let query = query.to_lowercase();
    let exact: Vec<&MovieSummary> = results
        .iter()
        .filter(|movie| {
            movie.title.to_lowercase() == query
                || movie
                    .original_title
                    .as_deref()
                    .is_some_and(|t| t.to_lowercase() == query)
        })
        .collect();

    if !exact.is_empty() {
        if let Some(year) = year {
            if let Some(movie) = exact
                .iter()
                .find(|movie| movie.release_year() == Some(year))
            {
                return Some(movie);
            }
        }
        return Some(exact[0]);
    }

    results.first()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::testing::StaticProvider;
    use tokio_test::assert_ok;

    fn summary(id: i64, title: &str, date: &str) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            original_title: Some(title.to_string()),
            release_date: Some(date.to_string()),
            overview: None,
            poster_path: None,
            backdrop_path: None,
            vote_average: None,
        }
    }

    fn detailed(id: i64, title: &str, date: &str) -> ResolvedMovie {
        ResolvedMovie {
            id,
            title: title.to_string(),
            original_title: Some(title.to_string()),
            release_date: Some(date.to_string()),
            overview: Some(format!("{title} overview")),
            poster_path: Some(format!("/{id}.jpg")),
            backdrop_path: None,
            vote_average: Some(7.0),
            genres: vec!["Action".to_string()],
            runtime: Some(120),
            director: Some("Someone".to_string()),
            cast: vec!["An Actor".to_string()],
            trailer_key: None,
        }
    }

    #[test]
    fn test_pick_candidate_prefers_year_narrowed_exact_match() {
        let results = vec![
            summary(1, "Dune", "1984-12-14"),
            summary(2, "Dune", "2021-09-15"),
        ];
        let picked = pick_candidate("dune", Some("2021"), &results).unwrap();
        assert_eq!(picked.id, 2);
    }

    #[test]
    fn test_pick_candidate_exact_match_without_year_subset() {
        // no exact match carries 2030, so the year filter falls away
        let results = vec![
            summary(1, "Dune", "1984-12-14"),
            summary(2, "Dune", "2021-09-15"),
        ];
        let picked = pick_candidate("dune", Some("2030"), &results).unwrap();
        assert_eq!(picked.id, 1);
    }

    #[test]
    fn test_pick_candidate_falls_back_to_first_result() {
        let results = vec![
            summary(9, "Dune: Part Two", "2024-02-27"),
            summary(2, "Dune", "2021-09-15"),
        ];
        let picked = pick_candidate("dune part", None, &results).unwrap();
        assert_eq!(picked.id, 9);
    }

    #[test]
    fn test_pick_candidate_matches_original_title() {
        let mut foreign = summary(5, "Spirited Away", "2001-07-20");
        foreign.original_title = Some("千と千尋の神隠し".to_string());
        let results = vec![foreign];
        let picked = pick_candidate("千と千尋の神隠し", None, &results).unwrap();
        assert_eq!(picked.id, 5);
    }

    #[test]
    fn test_pick_candidate_empty_results() {
        assert!(pick_candidate("nothing", None, &[]).is_none());
    }

    #[tokio::test]
    async fn test_resolve_by_title_returns_full_details() {
        let provider =
            StaticProvider::new().with_movie("blade runner", detailed(78, "Blade Runner", "1982-06-25"));
        let resolver = MovieResolver::new(Arc::new(provider));

        let movie = assert_ok!(resolver.resolve_by_title("Blade Runner", None).await);
        assert_eq!(movie.id, 78);
        assert_eq!(movie.genres, vec!["Action"]);
    }

    #[tokio::test]
    async fn test_resolve_by_title_empty_results_is_not_found() {
        let resolver = MovieResolver::new(Arc::new(StaticProvider::new()));
        let err = resolver
            .resolve_by_title("No Such Movie", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_resolve_by_title_search_failure_is_not_found() {
        let mut provider = StaticProvider::new();
        provider.broken_search = true;
        let resolver = MovieResolver::new(Arc::new(provider));

        let err = resolver
            .resolve_by_title("Blade Runner", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_resolve_by_title_blank_title_is_invalid_input() {
        let resolver = MovieResolver::new(Arc::new(StaticProvider::new()));
        let err = resolver.resolve_by_title("  ", None).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_pinned_title_bypasses_search() {
        // no search entry for "the matrix": only the pinned id path can hit
        let mut provider = StaticProvider::new();
        provider
            .details
            .insert(603, detailed(603, "The Matrix", "1999-03-30"));
        let resolver = MovieResolver::new(Arc::new(provider));

        let movie = resolver
            .resolve_by_title("The Matrix", Some("1999"))
            .await
            .unwrap();
        assert_eq!(movie.id, 603);
    }

    #[tokio::test]
    async fn test_popular_movies_truncates_and_attaches_trailers() {
        let mut provider = StaticProvider::new();
        provider.popular = (1..=20)
            .map(|id| summary(id, &format!("Movie {id}"), "2024-01-01"))
            .collect();
        for id in 1..=20 {
            provider.trailers.insert(id, format!("trailer-{id}"));
        }
        // item 5's trailer lookup blows up; the listing must not care
        provider.broken_trailers.insert(5);

        let resolver = MovieResolver::new(Arc::new(provider));
        let popular = resolver.popular_movies(10).await.unwrap();

        assert_eq!(popular.len(), 10);
        for (index, entry) in popular.iter().enumerate() {
            assert_eq!(entry.movie.id, index as i64 + 1);
        }
        assert_eq!(popular[3].trailer_key.as_deref(), Some("trailer-4"));
        assert_eq!(popular[4].trailer_key, None);
        assert_eq!(popular[5].trailer_key.as_deref(), Some("trailer-6"));
    }
}
