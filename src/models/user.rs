use serde::Serialize;
use std::fmt::Display;
use uuid::Uuid;

use super::MovieId;

/// Store-native user key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// The single conversion from the inbound string form to the store key
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User record as owned by the store
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: UserId,
    pub liked_movies: Vec<MovieId>,
    pub recommended_movies: Vec<MovieId>,
}

impl UserRecord {
    pub fn likes(&self, movie_id: MovieId) -> bool {
        self.liked_movies.contains(&movie_id)
    }
}
