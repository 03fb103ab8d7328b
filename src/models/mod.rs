use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod user;

pub use user::{UserId, UserRecord};

/// Upstream (TMDB) movie identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub i64);

impl MovieId {
    /// Validates a raw identifier; upstream ids are strictly positive
    pub fn new(raw: i64) -> Option<Self> {
        (raw > 0).then_some(Self(raw))
    }
}

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Textual feature document for one movie, built once per recommendation run
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDocument {
    pub id: MovieId,
    pub title: String,
    /// Genre names, keyword names and overview joined by single spaces
    pub text: String,
}

impl MovieDocument {
    pub fn new(id: MovieId, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            text: text.into(),
        }
    }
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Response from GET /movie/{id}?append_to_response=keywords
///
/// Every field is optional upstream; absent values collapse to empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbMovieDetails {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<TmdbNamed>,
    #[serde(default)]
    pub keywords: TmdbKeywords,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbKeywords {
    #[serde(default)]
    pub keywords: Vec<TmdbNamed>,
}

/// Genre or keyword entry; only the name feeds the text document
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbNamed {
    pub name: String,
}

impl TmdbMovieDetails {
    /// Builds the feature document: genres, then keywords, then overview
    pub fn into_document(self, id: MovieId) -> MovieDocument {
        let genres = self
            .genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let keywords = self
            .keywords
            .keywords
            .iter()
            .map(|k| k.name.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let overview = self.overview.unwrap_or_default();

        let text = format!("{} {} {}", genres, keywords, overview);

        MovieDocument::new(id, self.title.unwrap_or_default(), text)
    }
}

/// Response from GET /movie/popular
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPopularPage {
    #[serde(default)]
    pub results: Vec<TmdbMovieSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieSummary {
    pub id: i64,
}
