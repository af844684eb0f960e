use serde::{Deserialize, Serialize};

use super::movie::ResolvedMovie;

/// An AI-sourced suggestion before it has been matched against the
/// metadata provider. The year is kept as text because generators emit
/// "N/A" for movies they cannot date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestionDraft {
    pub title: String,
    pub year: String,
    pub director: Option<String>,
    pub reason: String,
}

impl SuggestionDraft {
    /// Year usable as a provider search filter, if the draft has one
    pub fn search_year(&self) -> Option<&str> {
        let year = self.year.trim();
        if year.is_empty() || year.eq_ignore_ascii_case("n/a") {
            None
        } else {
            Some(year)
        }
    }

    /// Converts this draft into its failed form with the given reason
    pub fn into_failed(self, error: impl Into<String>) -> FailedSuggestion {
        FailedSuggestion {
            title: self.title,
            year: self.year,
            director: self.director,
            reason: self.reason,
            error: error.into(),
        }
    }
}

/// A draft merged with the resolved movie's display metadata.
///
/// Display fields come from the metadata provider; the draft keeps its
/// similarity rationale verbatim, and its director when it named one.
/// Optional fields serialize as explicit nulls so the client never sees
/// a field vanish between entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedSuggestion {
    pub title: String,
    pub year: String,
    pub director: Option<String>,
    pub reason: String,
    pub id: i64,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    /// Genre names; field name kept from the legacy wire contract
    pub genre_ids: Vec<String>,
    pub runtime: Option<u32>,
    #[serde(rename = "trailerKey")]
    pub trailer_key: Option<String>,
    pub cast: Vec<String>,
}

impl EnrichedSuggestion {
    /// Merges a draft with the movie it resolved to
    pub fn merge(draft: SuggestionDraft, movie: ResolvedMovie) -> Self {
        Self {
            director: draft.director.or(movie.director),
            title: draft.title,
            year: draft.year,
            reason: draft.reason,
            id: movie.id,
            poster_path: movie.poster_path,
            backdrop_path: movie.backdrop_path,
            overview: movie.overview,
            release_date: movie.release_date,
            vote_average: movie.vote_average,
            genre_ids: movie.genres,
            runtime: movie.runtime,
            trailer_key: movie.trailer_key,
            cast: movie.cast,
        }
    }
}

/// A draft that could not be enriched, with the reason it failed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FailedSuggestion {
    pub title: String,
    pub year: String,
    pub director: Option<String>,
    pub reason: String,
    pub error: String,
}

/// Summary of the queried movie echoed back with the suggestions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchedMovie {
    pub id: i64,
    pub title: String,
    pub year: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    /// Genre names; field name kept from the legacy wire contract
    pub genre_ids: Vec<String>,
}

impl From<&ResolvedMovie> for SearchedMovie {
    fn from(movie: &ResolvedMovie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            year: movie
                .release_year()
                .unwrap_or("N/A")
                .to_string(),
            poster_path: movie.poster_path.clone(),
            backdrop_path: movie.backdrop_path.clone(),
            overview: movie.overview.clone(),
            release_date: movie.release_date.clone(),
            vote_average: movie.vote_average,
            genre_ids: movie.genres.clone(),
        }
    }
}

/// The complete outcome of one suggestion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionResult {
    #[serde(rename = "searchedMovie")]
    pub searched_movie: SearchedMovie,
    pub suggestions: Vec<EnrichedSuggestion>,
    #[serde(
        rename = "failedSuggestions",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub failed_suggestions: Option<Vec<FailedSuggestion>>,
}
