use std::sync::Arc;

/// Movie metadata provider abstraction
///
/// Providers resolve movie ids to feature documents and supply the candidate
/// pool. Both operations degrade to "no data" on upstream failure; nothing
/// raised here aborts a recommendation run.
use crate::models::{MovieDocument, MovieId};

pub mod tmdb;

pub use tmdb::TmdbProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch the feature document for one movie
    ///
    /// Returns `None` when the upstream call fails or the response is malformed.
    async fn fetch_movie(&self, movie_id: MovieId) -> Option<MovieDocument>;

    /// Fetch one page of the popularity listing, in upstream rank order
    ///
    /// Returns an empty list on failure.
    async fn popular_movies(&self, page: u32) -> Vec<MovieId>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Fetches documents for many movies concurrently
///
/// One task per id; results are reassembled in input order and failures are
/// dropped after being tallied.
pub async fn fetch_documents(
    provider: Arc<dyn MetadataProvider>,
    movie_ids: &[MovieId],
) -> Vec<MovieDocument> {
    let mut tasks = Vec::with_capacity(movie_ids.len());

    for &movie_id in movie_ids {
        let provider = provider.clone();
        let task = tokio::spawn(async move { provider.fetch_movie(movie_id).await });
        tasks.push((movie_id, task));
    }

    let mut documents = Vec::with_capacity(tasks.len());
    let mut failed = 0usize;

    for (movie_id, task) in tasks {
        match task.await {
            Ok(Some(document)) => documents.push(document),
            Ok(None) => failed += 1,
            Err(e) => {
                tracing::error!(movie_id = %movie_id, error = %e, "Task join error");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        tracing::warn!(
            provider = provider.name(),
            success_count = documents.len(),
            error_count = failed,
            "Partial movie metadata fetch failure"
        );
    }

    documents
}

/// Collects the candidate pool from the first `page_count` popularity pages
///
/// Ids repeated across pages keep their first position.
pub async fn fetch_candidate_ids(
    provider: &dyn MetadataProvider,
    page_count: u32,
) -> Vec<MovieId> {
    let mut seen = std::collections::HashSet::new();
    let mut candidates = Vec::new();

    for page in 1..=page_count.max(1) {
        for movie_id in provider.popular_movies(page).await {
            if seen.insert(movie_id) {
                candidates.push(movie_id);
            }
        }
    }

    candidates
}
