use serde::{Deserialize, Serialize};

/// A single entry from the metadata provider's search or listing endpoints.
///
/// Carries only the fields those endpoints return; credits, genres and
/// trailer data require a follow-up detail fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl MovieSummary {
    /// Four-digit release year, when the provider supplied a usable date
    pub fn release_year(&self) -> Option<&str> {
        self.release_date.as_deref().and_then(|d| d.get(..4))
    }
}

/// A movie fully resolved against the metadata provider, including credits
/// and trailer data. Constructed once by the resolver and read-only after.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedMovie {
    pub id: i64,
    pub title: String,
    pub original_title: Option<String>,
    pub release_date: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f64>,
    /// Genre names, human-readable
    pub genres: Vec<String>,
    pub runtime: Option<u32>,
    pub director: Option<String>,
    /// Top-billed cast, at most five names
    pub cast: Vec<String>,
    /// YouTube key of the first trailer, when one exists
    pub trailer_key: Option<String>,
}

impl ResolvedMovie {
    pub fn release_year(&self) -> Option<&str> {
        self.release_date.as_deref().and_then(|d| d.get(..4))
    }
}

/// A popularity-ranked listing entry, best-effort augmented with a trailer
#[derive(Debug, Clone, PartialEq)]
pub struct PopularMovie {
    pub movie: MovieSummary,
    pub trailer_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(release_date: Option<&str>) -> MovieSummary {
        MovieSummary {
            id: 603,
            title: "The Matrix".to_string(),
            original_title: Some("The Matrix".to_string()),
            release_date: release_date.map(str::to_string),
            overview: Some("A computer hacker learns the truth.".to_string()),
            poster_path: Some("/matrix.jpg".to_string()),
            backdrop_path: None,
            vote_average: Some(8.2),
        }
    }

    #[test]
    fn test_release_year_from_full_date() {
        assert_eq!(summary(Some("1999-03-30")).release_year(), Some("1999"));
    }

    #[test]
    fn test_release_year_missing_date() {
        assert_eq!(summary(None).release_year(), None);
    }

    #[test]
    fn test_release_year_truncated_date() {
        assert_eq!(summary(Some("99")).release_year(), None);
    }
}
