use std::collections::{HashMap, HashSet};

use crate::models::{MovieDocument, MovieId};

/// Minimum number of documents for a meaningful similarity comparison
pub const MIN_CORPUS_SIZE: usize = 2;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("corpus needs at least {required} documents, got {found}")]
pub struct InsufficientData {
    pub found: usize,
    pub required: usize,
}

/// Deduplicated set of documents for one recommendation run
///
/// Iteration order is liked documents first, then candidates, each in input
/// order. Every id appears at most once.
#[derive(Debug, Clone)]
pub struct Corpus {
    documents: Vec<MovieDocument>,
    positions: HashMap<MovieId, usize>,
}

/// Drops candidate ids already in the liked set, keeping candidate order
pub fn exclude_liked(candidate_ids: &[MovieId], liked_ids: &[MovieId]) -> Vec<MovieId> {
    let liked: HashSet<MovieId> = liked_ids.iter().copied().collect();
    candidate_ids
        .iter()
        .copied()
        .filter(|id| !liked.contains(id))
        .collect()
}

impl Corpus {
    /// Assembles liked and candidate documents into one corpus
    ///
    /// A candidate document is kept only if its id is in `candidate_ids` and
    /// not in `liked_ids`. Duplicates resolve to the first occurrence.
    pub fn build(
        liked_ids: &[MovieId],
        liked_docs: Vec<MovieDocument>,
        candidate_ids: &[MovieId],
        candidate_docs: Vec<MovieDocument>,
    ) -> Result<Self, InsufficientData> {
        let liked: HashSet<MovieId> = liked_ids.iter().copied().collect();
        let pool: HashSet<MovieId> = candidate_ids.iter().copied().collect();

        let mut corpus = Self {
            documents: Vec::with_capacity(liked_docs.len() + candidate_docs.len()),
            positions: HashMap::new(),
        };

        for document in liked_docs {
            corpus.insert(document);
        }

        for document in candidate_docs {
            if pool.contains(&document.id) && !liked.contains(&document.id) {
                corpus.insert(document);
            }
        }

        if corpus.len() < MIN_CORPUS_SIZE {
            return Err(InsufficientData {
                found: corpus.len(),
                required: MIN_CORPUS_SIZE,
            });
        }

        Ok(corpus)
    }

    fn insert(&mut self, document: MovieDocument) {
        if self.positions.contains_key(&document.id) {
            return;
        }
        self.positions.insert(document.id, self.documents.len());
        self.documents.push(document);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn contains(&self, movie_id: MovieId) -> bool {
        self.positions.contains_key(&movie_id)
    }

    pub fn get(&self, movie_id: MovieId) -> Option<&MovieDocument> {
        self.positions.get(&movie_id).map(|&i| &self.documents[i])
    }

    pub fn documents(&self) -> &[MovieDocument] {
        &self.documents
    }
}
