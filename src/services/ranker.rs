use super::{features::FeatureMatrix, profile::ProfileVector};
use crate::models::MovieId;

/// Default length of a stored recommendation list
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredMovie {
    pub movie_id: MovieId,
    pub score: f64,
}

/// Candidates ordered by descending similarity, at most `top_n` long
#[derive(Debug, Clone, PartialEq)]
pub struct RankedList(pub Vec<ScoredMovie>);

impl RankedList {
    pub fn movie_ids(&self) -> Vec<MovieId> {
        self.0.iter().map(|scored| scored.movie_id).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Ranking {
    Ranked(RankedList),
    /// None of the candidate ids has a row in the feature space
    NoCandidates,
}

/// Cosine similarity clamped to [-1, 1]; 0 when either side is a zero vector
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let (mut dot, mut norm_a, mut norm_b) = (0f64, 0f64, 0f64);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Scores candidates against the profile and keeps the best `top_n`
///
/// Equal scores keep candidate input order.
pub fn rank(
    profile: &ProfileVector,
    matrix: &FeatureMatrix,
    candidate_ids: &[MovieId],
    top_n: usize,
) -> Ranking {
    let mut seen = std::collections::HashSet::new();
    let mut scored: Vec<ScoredMovie> = candidate_ids
        .iter()
        .filter(|id| seen.insert(**id))
        .filter_map(|&movie_id| {
            matrix.row(movie_id).map(|row| ScoredMovie {
                movie_id,
                score: cosine_similarity(profile.as_slice(), row),
            })
        })
        .collect();

    if scored.is_empty() {
        return Ranking::NoCandidates;
    }

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(top_n);

    Ranking::Ranked(RankedList(scored))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieDocument;
    use crate::services::{corpus::Corpus, profile::aggregate};

    fn fixture(
        liked: &[(i64, &str)],
        candidates: &[(i64, &str)],
    ) -> (FeatureMatrix, ProfileVector, Vec<MovieId>) {
        let to_docs = |items: &[(i64, &str)]| -> Vec<MovieDocument> {
            items
                .iter()
                .map(|(id, text)| MovieDocument::new(MovieId(*id), "", *text))
                .collect()
        };
        let liked_ids: Vec<MovieId> = liked.iter().map(|(id, _)| MovieId(*id)).collect();
        let candidate_ids: Vec<MovieId> = candidates.iter().map(|(id, _)| MovieId(*id)).collect();
        let corpus =
            Corpus::build(&liked_ids, to_docs(liked), &candidate_ids, to_docs(candidates)).unwrap();
        let matrix = FeatureMatrix::vectorize(&corpus);
        let profile = aggregate(&matrix, &liked_ids).unwrap();
        (matrix, profile, candidate_ids)
    }

    fn ranked(ranking: Ranking) -> RankedList {
        match ranking {
            Ranking::Ranked(list) => list,
            Ranking::NoCandidates => panic!("expected a ranked list"),
        }
    }

    #[test]
    fn test_cosine_identical_vectors_is_one() {
        let v = [0.3, 0.4, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_bounds() {
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-12);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_rank_orders_by_similarity() {
        let (matrix, profile, candidates) = fixture(
            &[(1, "space alien invasion")],
            &[(2, "romance wedding"), (3, "space alien"), (4, "space")],
        );

        let list = ranked(rank(&profile, &matrix, &candidates, DEFAULT_TOP_N));

        assert_eq!(list.movie_ids()[0], MovieId(3));
        assert_eq!(*list.movie_ids().last().unwrap(), MovieId(2));
        assert!(list.0.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(list.0.iter().all(|s| (-1.0..=1.0).contains(&s.score)));
    }

    #[test]
    fn test_rank_ties_keep_candidate_order() {
        let (matrix, profile, candidates) = fixture(
            &[(1, "space")],
            &[(5, "cooking"), (2, "gardening"), (9, "knitting")],
        );

        let list = ranked(rank(&profile, &matrix, &candidates, DEFAULT_TOP_N));
        assert_eq!(list.movie_ids(), vec![MovieId(5), MovieId(2), MovieId(9)]);
    }

    #[test]
    fn test_rank_truncates_to_top_n() {
        let candidates: Vec<(i64, String)> =
            (2..20).map(|id| (id, format!("space term{}", id))).collect();
        let candidates: Vec<(i64, &str)> =
            candidates.iter().map(|(id, t)| (*id, t.as_str())).collect();
        let (matrix, profile, ids) = fixture(&[(1, "space")], &candidates);

        let list = ranked(rank(&profile, &matrix, &ids, 5));
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn test_rank_without_candidate_rows() {
        let (matrix, profile, _) = fixture(&[(1, "space")], &[(2, "drama")]);
        assert_eq!(
            rank(&profile, &matrix, &[MovieId(77)], DEFAULT_TOP_N),
            Ranking::NoCandidates
        );
        assert_eq!(
            rank(&profile, &matrix, &[], DEFAULT_TOP_N),
            Ranking::NoCandidates
        );
    }

    #[test]
    fn test_rank_is_deterministic() {
        let (matrix, profile, candidates) = fixture(
            &[(1, "heist crew vault")],
            &[(2, "vault"), (3, "crew heist"), (4, "ocean")],
        );

        let first = rank(&profile, &matrix, &candidates, DEFAULT_TOP_N);
        let second = rank(&profile, &matrix, &candidates, DEFAULT_TOP_N);
        assert_eq!(first, second);
    }
}
