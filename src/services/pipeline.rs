use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::{
    error::{AppError, AppResult},
    models::{
        EnrichedSuggestion, FailedSuggestion, ResolvedMovie, SearchedMovie, SuggestionDraft,
        SuggestionResult,
    },
    services::{generator::SuggestionGenerator, parser, resolver::MovieResolver},
};

/// Upper bound on concurrent per-suggestion resolutions
const MAX_CONCURRENT_ENRICHMENTS: usize = 5;

/// How many fallback suggestions to synthesize from the provider's own
/// similar-movies listing
const FALLBACK_SUGGESTION_LIMIT: usize = 10;

/// Outcome of enriching a single draft; exactly one of the two
enum EnrichOutcome {
    Enriched(Box<EnrichedSuggestion>),
    Failed(FailedSuggestion),
}

/// Orchestrates one suggestion request end to end: resolve the query,
/// generate raw suggestion text, parse it into drafts, enrich every draft
/// independently, and aggregate partial failures as data.
pub struct SuggestionPipeline {
    resolver: MovieResolver,
    generator: Arc<SuggestionGenerator>,
}

impl SuggestionPipeline {
    pub fn new(resolver: MovieResolver, generator: Arc<SuggestionGenerator>) -> Self {
        Self {
            resolver,
            generator,
        }
    }

    /// Produces enriched suggestions for a movie title.
    ///
    /// An unresolvable query is `NotFound`. A generation failure falls back
    /// to the provider's similar-movies listing; when both paths fail the
    /// request fails with `GenerationFailed` carrying both messages. Zero
    /// parsed drafts or zero surviving enrichments fail with `EmptyResult`.
    pub async fn suggest(&self, title: &str, year: Option<&str>) -> AppResult<SuggestionResult> {
        let movie = self.resolver.resolve_by_title(title, year).await?;

        tracing::info!(
            query = %title,
            resolved = %movie.title,
            resolved_year = movie.release_year().unwrap_or("N/A"),
            "Query movie resolved"
        );

        let drafts = self.collect_drafts(&movie).await?;

        let (suggestions, failed) = self.enrich_all(drafts).await;

        tracing::info!(
            movie = %movie.title,
            enriched = suggestions.len(),
            failed = failed.len(),
            "Suggestion enrichment completed"
        );

        if suggestions.is_empty() {
            return Err(AppError::EmptyResult(format!(
                "all {} suggestions failed enrichment",
                failed.len()
            )));
        }

        Ok(SuggestionResult {
            searched_movie: SearchedMovie::from(&movie),
            suggestions,
            failed_suggestions: if failed.is_empty() { None } else { Some(failed) },
        })
    }

    /// Obtains drafts from the generative backend, or from the provider's
    /// similar-movies listing when the backend fails
    async fn collect_drafts(&self, movie: &ResolvedMovie) -> AppResult<Vec<SuggestionDraft>> {
        match self.generator.generate(movie).await {
            Ok(raw) => {
                let drafts = parser::parse(&raw);
                if drafts.is_empty() {
                    return Err(AppError::EmptyResult(
                        "generator output contained no usable suggestions".to_string(),
                    ));
                }
                Ok(drafts)
            }
            Err(primary) => {
                tracing::warn!(
                    movie = %movie.title,
                    error = %primary,
                    "Generation failed, falling back to similar-movies listing"
                );
                match self.fallback_drafts(movie).await {
                    Ok(drafts) if !drafts.is_empty() => Ok(drafts),
                    Ok(_) => Err(AppError::EmptyResult(
                        "similar-movies fallback returned no entries".to_string(),
                    )),
                    Err(fallback) => Err(AppError::GenerationFailed {
                        primary: primary.to_string(),
                        fallback: fallback.to_string(),
                    }),
                }
            }
        }
    }

    /// Synthesizes drafts from the provider's similar-movies listing, with
    /// a best-effort concurrent director lookup per entry
    async fn fallback_drafts(&self, movie: &ResolvedMovie) -> AppResult<Vec<SuggestionDraft>> {
        let similar = self.resolver.similar_movies(movie.id).await?;
        let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_ENRICHMENTS));

        let mut tasks = Vec::new();
        for entry in similar.into_iter().take(FALLBACK_SUGGESTION_LIMIT) {
            let resolver = self.resolver.clone();
            let semaphore = Arc::clone(&semaphore);
            let source_title = movie.title.clone();
            tasks.push(tokio::spawn(async move {
                let director = match semaphore.acquire_owned().await {
                    Ok(_permit) => resolver
                        .resolve_by_id(entry.id)
                        .await
                        .ok()
                        .and_then(|details| details.director),
                    Err(_) => None,
                };

                let overview_snippet: String = entry
                    .overview
                    .as_deref()
                    .unwrap_or("")
                    .chars()
                    .take(100)
                    .collect();

                let year = entry.release_year().unwrap_or("N/A").to_string();

                SuggestionDraft {
                    title: entry.title,
                    year,
                    director: Some(director.unwrap_or_else(|| "Unknown".to_string())),
                    reason: format!(
                        "Similar to {} in genre and style. {}...",
                        source_title, overview_snippet
                    ),
                }
            }));
        }

        let mut drafts = Vec::new();
        for task in tasks {
            match task.await {
                Ok(draft) => drafts.push(draft),
                Err(e) => {
                    tracing::error!(error = %e, "Task join error");
                }
            }
        }

        tracing::info!(
            movie = %movie.title,
            drafts = drafts.len(),
            "Fallback drafts synthesized"
        );

        Ok(drafts)
    }

    /// Enriches every draft independently with bounded concurrency.
    ///
    /// Each task yields a tagged outcome; no failure escapes the group and
    /// the generator's ordering is preserved on both sides of the split.
    async fn enrich_all(
        &self,
        drafts: Vec<SuggestionDraft>,
    ) -> (Vec<EnrichedSuggestion>, Vec<FailedSuggestion>) {
        let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_ENRICHMENTS));

        let mut tasks = Vec::new();
        for draft in drafts {
            let resolver = self.resolver.clone();
            let semaphore = Arc::clone(&semaphore);
            tasks.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return EnrichOutcome::Failed(draft.into_failed("task cancelled")),
                };
                enrich_one(resolver, draft).await
            }));
        }

        let mut suggestions = Vec::new();
        let mut failed = Vec::new();
        for task in tasks {
            match task.await {
                Ok(EnrichOutcome::Enriched(suggestion)) => suggestions.push(*suggestion),
                Ok(EnrichOutcome::Failed(failure)) => failed.push(failure),
                Err(e) => {
                    tracing::error!(error = %e, "Task join error");
                }
            }
        }

        (suggestions, failed)
    }
}

/// Resolves one draft against the metadata provider and merges the result
async fn enrich_one(resolver: MovieResolver, draft: SuggestionDraft) -> EnrichOutcome {
    if draft.title.trim().is_empty() {
        return EnrichOutcome::Failed(draft.into_failed("Missing title"));
    }

    let year = draft.search_year().map(str::to_string);
    match resolver
        .resolve_by_title(&draft.title, year.as_deref())
        .await
    {
        Ok(movie) => {
            tracing::debug!(title = %draft.title, id = movie.id, "Suggestion enriched");
            EnrichOutcome::Enriched(Box::new(EnrichedSuggestion::merge(draft, movie)))
        }
        Err(AppError::NotFound(_)) => {
            tracing::debug!(title = %draft.title, "Suggestion not found in TMDB");
            EnrichOutcome::Failed(draft.into_failed("Not found in TMDB"))
        }
        Err(e) => {
            tracing::debug!(title = %draft.title, error = %e, "Suggestion enrichment failed");
            let message = e.to_string();
            EnrichOutcome::Failed(draft.into_failed(message))
        }
    }
}
