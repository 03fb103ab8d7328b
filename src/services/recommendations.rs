use std::sync::Arc;

use axum::http::StatusCode;

use super::{
    corpus::{exclude_liked, Corpus},
    features::FeatureMatrix,
    profile,
    providers::{fetch_candidate_ids, fetch_documents, MetadataProvider},
    ranker::{self, RankedList, Ranking, DEFAULT_TOP_N},
};
use crate::{
    db::UserStore,
    error::AppResult,
    models::{MovieId, UserId},
};

/// Terminal state of one recommendation run
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The inbound id is not a valid store key
    InvalidIdentifier,
    UserNotFound,
    /// No liked movies; the stored list was cleared
    LikesCleared,
    /// Every liked-movie fetch failed
    LikedDataUnavailable,
    /// Nothing left in the candidate pool once liked movies are removed
    NoNewCandidates,
    /// Every candidate fetch failed; stored list untouched
    CandidateDataUnavailable,
    /// Fewer than two documents in the corpus
    InsufficientData,
    /// No liked movie made it into the feature space
    ProfileUnavailable,
    /// No candidate made it into the feature space; stored list untouched
    NoComparableCandidates,
    /// A new list was ranked and stored
    Updated(RankedList),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            RunOutcome::LikesCleared
                | RunOutcome::NoNewCandidates
                | RunOutcome::NoComparableCandidates
                | RunOutcome::Updated(_)
        )
    }

    pub fn message(&self) -> &'static str {
        match self {
            RunOutcome::InvalidIdentifier => "Invalid user ID format",
            RunOutcome::UserNotFound => "User not found",
            RunOutcome::LikesCleared => "User has no liked movies, recommendations cleared",
            RunOutcome::LikedDataUnavailable => "Could not fetch liked movie details",
            RunOutcome::NoNewCandidates => "No new candidate movies to recommend from",
            RunOutcome::CandidateDataUnavailable => "Could not fetch candidate movie details",
            RunOutcome::InsufficientData => "Not enough movie data for comparison",
            RunOutcome::ProfileUnavailable => "Could not create profile from liked movies",
            RunOutcome::NoComparableCandidates => "No valid candidates to compare",
            RunOutcome::Updated(_) => "Recommendations generated successfully",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RunOutcome::UserNotFound => StatusCode::NOT_FOUND,
            outcome if outcome.is_success() => StatusCode::OK,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The newly stored list, only when this run replaced it
    pub fn recommended_movies(&self) -> Option<Vec<MovieId>> {
        match self {
            RunOutcome::Updated(list) => Some(list.movie_ids()),
            RunOutcome::LikesCleared => Some(Vec::new()),
            _ => None,
        }
    }
}

/// Tunables for a recommendation run
#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    pub candidate_page_count: u32,
    pub top_n: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            candidate_page_count: 1,
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// Recomputes a user's recommendations from scratch on every run
pub struct RecommendationEngine {
    store: Arc<dyn UserStore>,
    provider: Arc<dyn MetadataProvider>,
    settings: EngineSettings,
}

impl RecommendationEngine {
    pub fn new(
        store: Arc<dyn UserStore>,
        provider: Arc<dyn MetadataProvider>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            store,
            provider,
            settings,
        }
    }

    /// Runs the pipeline for the inbound string form of a user id
    ///
    /// Only store faults surface as errors; every expected terminal is a
    /// `RunOutcome`.
    pub async fn run(&self, raw_user_id: &str) -> AppResult<RunOutcome> {
        match UserId::parse(raw_user_id) {
            Some(user_id) => self.run_for_user(user_id).await,
            None => {
                tracing::warn!(user_id = raw_user_id, "Rejected malformed user id");
                Ok(RunOutcome::InvalidIdentifier)
            }
        }
    }

    pub async fn run_for_user(&self, user_id: UserId) -> AppResult<RunOutcome> {
        let outcome = self.compute(user_id).await?;

        if outcome.is_success() {
            tracing::info!(user_id = %user_id, outcome = outcome.message(), "Recommendation run finished");
        } else {
            tracing::warn!(user_id = %user_id, outcome = outcome.message(), "Recommendation run failed");
        }

        Ok(outcome)
    }

    async fn compute(&self, user_id: UserId) -> AppResult<RunOutcome> {
        let Some(user) = self.store.find_user(user_id).await? else {
            return Ok(RunOutcome::UserNotFound);
        };

        let liked_ids = user.liked_movies;
        if liked_ids.is_empty() {
            self.store.set_recommendations(user_id, &[]).await?;
            return Ok(RunOutcome::LikesCleared);
        }

        let liked_docs = fetch_documents(self.provider.clone(), &liked_ids).await;
        if liked_docs.is_empty() {
            return Ok(RunOutcome::LikedDataUnavailable);
        }

        let candidate_ids = exclude_liked(
            &fetch_candidate_ids(self.provider.as_ref(), self.settings.candidate_page_count).await,
            &liked_ids,
        );
        if candidate_ids.is_empty() {
            return Ok(RunOutcome::NoNewCandidates);
        }

        let candidate_docs = fetch_documents(self.provider.clone(), &candidate_ids).await;
        if candidate_docs.is_empty() {
            return Ok(RunOutcome::CandidateDataUnavailable);
        }

        tracing::debug!(
            user_id = %user_id,
            liked = liked_docs.len(),
            candidates = candidate_docs.len(),
            "Building corpus"
        );

        let corpus = match Corpus::build(&liked_ids, liked_docs, &candidate_ids, candidate_docs) {
            Ok(corpus) => corpus,
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Corpus too small");
                return Ok(RunOutcome::InsufficientData);
            }
        };

        let matrix = FeatureMatrix::vectorize(&corpus);
        if matrix.dimension() == 0 {
            tracing::warn!(user_id = %user_id, "Corpus has no terms after stop-word removal");
            return Ok(RunOutcome::ProfileUnavailable);
        }

        let Some(profile) = profile::aggregate(&matrix, &liked_ids) else {
            return Ok(RunOutcome::ProfileUnavailable);
        };

        match ranker::rank(&profile, &matrix, &candidate_ids, self.settings.top_n) {
            Ranking::NoCandidates => Ok(RunOutcome::NoComparableCandidates),
            Ranking::Ranked(list) => {
                self.store
                    .set_recommendations(user_id, &list.movie_ids())
                    .await?;
                Ok(RunOutcome::Updated(list))
            }
        }
    }
}
