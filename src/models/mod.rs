pub mod movie;
pub mod suggestion;
pub mod tmdb;

pub use movie::{MovieSummary, PopularMovie, ResolvedMovie};
pub use suggestion::{
    EnrichedSuggestion, FailedSuggestion, SearchedMovie, SuggestionDraft, SuggestionResult,
};
