use std::sync::Arc;

use crate::{error::AppResult, models::ResolvedMovie, services::providers::SuggestionBackend};

/// Produces raw similar-movie suggestion text for a resolved movie.
///
/// Builds one prompt from the movie's metadata and hands it to whichever
/// backend is configured. The raw response is returned unvalidated; the
/// parser decides what it contains.
pub struct SuggestionGenerator {
    backend: Arc<dyn SuggestionBackend>,
}

impl SuggestionGenerator {
    pub fn new(backend: Arc<dyn SuggestionBackend>) -> Self {
        Self { backend }
    }

    /// Generates raw suggestion text for the given movie
    pub async fn generate(&self, movie: &ResolvedMovie) -> AppResult<String> {
        let prompt = build_prompt(movie);

        tracing::debug!(
            movie = %movie.title,
            backend = self.backend.name(),
            prompt_len = prompt.len(),
            "Requesting suggestions"
        );

        let raw = self.backend.generate(&prompt).await?;

        tracing::debug!(
            movie = %movie.title,
            response_len = raw.len(),
            "Raw suggestion text received"
        );

        Ok(raw)
    }

    /// Whether the backend currently accepts its credentials
    pub async fn probe(&self) -> bool {
        self.backend.probe().await
    }
}

/// Builds the suggestion prompt from a movie's metadata.
///
/// Asks for exactly ten similar fictional movies as a JSON array and pins
/// the genre/tone constraint. Excluding the source movie and its sequels
/// is requested in wording only; the model may still ignore it.
fn build_prompt(movie: &ResolvedMovie) -> String {
    let year = movie.release_year().unwrap_or("N/A");
    let genres = movie.genres.join(", ");
    let director = movie.director.as_deref().unwrap_or("Unknown");
    let cast = movie.cast.join(", ");
    let overview = movie.overview.as_deref().unwrap_or("");

    format!(
        r#"You are a movie recommendation expert. Based on the movie "{title}" ({year}), which is a {genres} film directed by {director} starring {cast}, with the following overview: "{overview}", suggest 10 similar fictional movies that fans would enjoy.

IMPORTANT: Suggest only movies that are in the same genre and style as "{title}". Do NOT suggest documentaries unless the original movie is a documentary. Match the tone, themes, and type of the original movie. Do NOT suggest "{title}" itself or its direct sequels or prequels.

For each movie, provide:
1. Title
2. Year of release (just the year)
3. Director
4. Brief reason why it's similar (2-3 sentences explaining specific similarities in plot, themes, style, or tone)

Format your response as a JSON array with objects containing these fields: title, year, director, reason.
Example format:
[
  {{
    "title": "Movie Title",
    "year": "2020",
    "director": "Director Name",
    "reason": "Brief reason for recommendation"
  }}
]

Only respond with the JSON array, no other text."#,
        title = movie.title,
        year = year,
        genres = genres,
        director = director,
        cast = cast,
        overview = overview,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::MockSuggestionBackend;

    fn movie() -> ResolvedMovie {
        ResolvedMovie {
            id: 603,
            title: "The Matrix".to_string(),
            original_title: Some("The Matrix".to_string()),
            release_date: Some("1999-03-30".to_string()),
            overview: Some("A computer hacker learns the truth.".to_string()),
            poster_path: None,
            backdrop_path: None,
            vote_average: Some(8.2),
            genres: vec!["Action".to_string(), "Science Fiction".to_string()],
            runtime: Some(136),
            director: Some("Lana Wachowski".to_string()),
            cast: vec!["Keanu Reeves".to_string(), "Laurence Fishburne".to_string()],
            trailer_key: None,
        }
    }

    #[test]
    fn test_prompt_embeds_movie_context() {
        let prompt = build_prompt(&movie());
        assert!(prompt.contains("\"The Matrix\" (1999)"));
        assert!(prompt.contains("Action, Science Fiction"));
        assert!(prompt.contains("Lana Wachowski"));
        assert!(prompt.contains("Keanu Reeves, Laurence Fishburne"));
        assert!(prompt.contains("A computer hacker learns the truth."));
        assert!(prompt.contains("suggest 10 similar fictional movies"));
        assert!(prompt.contains("Do NOT suggest documentaries"));
    }

    #[test]
    fn test_prompt_handles_missing_metadata() {
        let mut sparse = movie();
        sparse.release_date = None;
        sparse.director = None;
        sparse.overview = None;
        let prompt = build_prompt(&sparse);
        assert!(prompt.contains("\"The Matrix\" (N/A)"));
        assert!(prompt.contains("directed by Unknown"));
    }

    #[tokio::test]
    async fn test_generate_passes_prompt_to_backend() {
        let mut backend = MockSuggestionBackend::new();
        backend
            .expect_name()
            .return_const("mock");
        backend
            .expect_generate()
            .withf(|prompt: &str| prompt.contains("\"The Matrix\" (1999)"))
            .returning(|_| Ok("[]".to_string()));

        let generator = SuggestionGenerator::new(Arc::new(backend));
        let raw = generator.generate(&movie()).await.unwrap();
        assert_eq!(raw, "[]");
    }

    #[tokio::test]
    async fn test_probe_delegates_to_backend() {
        let mut backend = MockSuggestionBackend::new();
        backend.expect_probe().returning(|| false);

        let generator = SuggestionGenerator::new(Arc::new(backend));
        assert!(!generator.probe().await);
    }
}
