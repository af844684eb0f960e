//! Raw TMDB wire types.
//!
//! These mirror the provider's JSON verbatim and are converted into the
//! domain types before they leave the provider layer.

use serde::Deserialize;

use super::movie::{MovieSummary, ResolvedMovie};

/// Response envelope for `/search/movie`, `/movie/popular` and
/// `/movie/{id}/similar`
#[derive(Debug, Deserialize)]
pub struct TmdbListResponse {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

/// One movie entry as returned by TMDB list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
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

impl From<TmdbMovie> for MovieSummary {
    fn from(movie: TmdbMovie) -> Self {
        MovieSummary {
            id: movie.id,
            title: movie.title,
            original_title: movie.original_title,
            // TMDB sends empty strings for unreleased titles
            release_date: movie.release_date.filter(|d| !d.is_empty()),
            overview: movie.overview.filter(|o| !o.is_empty()),
            poster_path: movie.poster_path,
            backdrop_path: movie.backdrop_path,
            vote_average: movie.vote_average,
        }
    }
}

/// `/movie/{id}` with `append_to_response=credits,videos`
#[derive(Debug, Deserialize)]
pub struct TmdbMovieDetails {
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
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub credits: Option<TmdbCredits>,
    #[serde(default)]
    pub videos: Option<TmdbVideoList>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<TmdbCastMember>,
    #[serde(default)]
    pub crew: Vec<TmdbCrewMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCastMember {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCrewMember {
    pub name: String,
    pub job: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TmdbVideoList {
    #[serde(default)]
    pub results: Vec<TmdbVideo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideo {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

/// Picks the first YouTube trailer out of a video listing
pub fn first_trailer_key(videos: &[TmdbVideo]) -> Option<String> {
    videos
        .iter()
        .find(|v| v.video_type == "Trailer" && v.site == "YouTube")
        .map(|v| v.key.clone())
}

impl From<TmdbMovieDetails> for ResolvedMovie {
    fn from(details: TmdbMovieDetails) -> Self {
        let credits = details.credits.unwrap_or_default();
        let director = credits
            .crew
            .iter()
            .find(|member| member.job == "Director")
            .map(|member| member.name.clone());
        let cast = credits
            .cast
            .iter()
            .take(5)
            .map(|member| member.name.clone())
            .collect();
        let trailer_key = details
            .videos
            .as_ref()
            .and_then(|videos| first_trailer_key(&videos.results));

        ResolvedMovie {
            id: details.id,
            title: details.title,
            original_title: details.original_title,
            release_date: details.release_date.filter(|d| !d.is_empty()),
            overview: details.overview.filter(|o| !o.is_empty()),
            poster_path: details.poster_path,
            backdrop_path: details.backdrop_path,
            vote_average: details.vote_average,
            genres: details.genres.into_iter().map(|g| g.name).collect(),
            runtime: details.runtime,
            director,
            cast,
            trailer_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tmdb_movie_deserialization() {
        let json = r#"{
            "id": 603,
            "title": "The Matrix",
            "original_title": "The Matrix",
            "release_date": "1999-03-30",
            "overview": "A computer hacker learns the truth.",
            "poster_path": "/matrix.jpg",
            "backdrop_path": null,
            "vote_average": 8.2
        }"#;

        let movie: TmdbMovie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.id, 603);
        assert_eq!(movie.title, "The Matrix");
        assert_eq!(movie.release_date.as_deref(), Some("1999-03-30"));
        assert_eq!(movie.vote_average, Some(8.2));
    }

    #[test]
    fn test_summary_drops_empty_release_date() {
        let json = r#"{"id": 1, "title": "Unreleased", "release_date": ""}"#;
        let summary: MovieSummary = serde_json::from_str::<TmdbMovie>(json).unwrap().into();
        assert_eq!(summary.release_date, None);
        assert_eq!(summary.release_year(), None);
    }

    #[test]
    fn test_details_to_resolved_movie() {
        let json = r#"{
            "id": 27205,
            "title": "Inception",
            "release_date": "2010-07-15",
            "overview": "A thief who steals corporate secrets.",
            "vote_average": 8.4,
            "runtime": 148,
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
            "credits": {
                "cast": [
                    {"name": "Leonardo DiCaprio"},
                    {"name": "Joseph Gordon-Levitt"},
                    {"name": "Elliot Page"},
                    {"name": "Tom Hardy"},
                    {"name": "Ken Watanabe"},
                    {"name": "Cillian Murphy"}
                ],
                "crew": [
                    {"name": "Emma Thomas", "job": "Producer"},
                    {"name": "Christopher Nolan", "job": "Director"}
                ]
            },
            "videos": {
                "results": [
                    {"key": "abc", "site": "Vimeo", "type": "Trailer"},
                    {"key": "clip1", "site": "YouTube", "type": "Clip"},
                    {"key": "YoHD9XEInc0", "site": "YouTube", "type": "Trailer"}
                ]
            }
        }"#;

        let details: TmdbMovieDetails = serde_json::from_str(json).unwrap();
        let movie: ResolvedMovie = details.into();

        assert_eq!(movie.director.as_deref(), Some("Christopher Nolan"));
        assert_eq!(movie.cast.len(), 5);
        assert_eq!(movie.cast[0], "Leonardo DiCaprio");
        assert_eq!(movie.genres, vec!["Action", "Science Fiction"]);
        assert_eq!(movie.trailer_key.as_deref(), Some("YoHD9XEInc0"));
        assert_eq!(movie.runtime, Some(148));
    }

    #[test]
    fn test_details_without_credits_or_videos() {
        let json = r#"{"id": 5, "title": "Bare"}"#;
        let movie: ResolvedMovie = serde_json::from_str::<TmdbMovieDetails>(json).unwrap().into();
        assert_eq!(movie.director, None);
        assert!(movie.cast.is_empty());
        assert!(movie.genres.is_empty());
        assert_eq!(movie.trailer_key, None);
    }

    #[test]
    fn test_first_trailer_key_requires_youtube_trailer() {
        let videos = vec![
            TmdbVideo {
                key: "teaser".to_string(),
                site: "YouTube".to_string(),
                video_type: "Teaser".to_string(),
            },
            TmdbVideo {
                key: "trailer".to_string(),
                site: "YouTube".to_string(),
                video_type: "Trailer".to_string(),
            },
        ];
        assert_eq!(first_trailer_key(&videos).as_deref(), Some("trailer"));
        assert_eq!(first_trailer_key(&videos[..1]), None);
    }
}
