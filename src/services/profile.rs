use super::features::FeatureMatrix;
use crate::models::MovieId;

/// Mean of the liked movies' feature rows
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileVector(pub Vec<f64>);

impl ProfileVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Averages the rows of liked movies present in the feature space
///
/// Returns `None` when none of the liked ids made it into the corpus.
pub fn aggregate(matrix: &FeatureMatrix, liked_ids: &[MovieId]) -> Option<ProfileVector> {
    let mut sum = vec![0f64; matrix.dimension()];
    let mut count = 0usize;
    let mut seen = std::collections::HashSet::new();

    for &movie_id in liked_ids {
        if !seen.insert(movie_id) {
            continue;
        }
        if let Some(row) = matrix.row(movie_id) {
            for (total, value) in sum.iter_mut().zip(row) {
                *total += value;
            }
            count += 1;
        }
    }

    if count == 0 {
        return None;
    }

    let count = count as f64;
    sum.iter_mut().for_each(|v| *v /= count);
    Some(ProfileVector(sum))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieDocument;
    use crate::services::corpus::Corpus;

    fn matrix(liked: &[(i64, &str)], candidates: &[(i64, &str)]) -> FeatureMatrix {
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
        FeatureMatrix::vectorize(&corpus)
    }

    #[test]
    fn test_single_liked_movie_is_its_own_row() {
        let m = matrix(&[(1, "space action")], &[(2, "drama")]);
        let profile = aggregate(&m, &[MovieId(1)]).unwrap();
        assert_eq!(profile.as_slice(), m.row(MovieId(1)).unwrap());
    }

    #[test]
    fn test_profile_is_elementwise_mean() {
        let m = matrix(&[(1, "space"), (2, "drama")], &[(3, "romance")]);
        let profile = aggregate(&m, &[MovieId(1), MovieId(2)]).unwrap();

        let a = m.row(MovieId(1)).unwrap();
        let b = m.row(MovieId(2)).unwrap();
        for i in 0..m.dimension() {
            assert!((profile.0[i] - (a[i] + b[i]) / 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_liked_ids_missing_from_corpus_are_skipped() {
        let m = matrix(&[(1, "space")], &[(2, "drama")]);
        let profile = aggregate(&m, &[MovieId(1), MovieId(99)]).unwrap();
        assert_eq!(profile.as_slice(), m.row(MovieId(1)).unwrap());
    }

    #[test]
    fn test_no_liked_rows_is_none() {
        let m = matrix(&[(1, "space")], &[(2, "drama")]);
        assert!(aggregate(&m, &[MovieId(99)]).is_none());
        assert!(aggregate(&m, &[]).is_none());
    }
}
