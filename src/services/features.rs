use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use super::corpus::Corpus;
use crate::models::MovieId;

/// Tokens are runs of at least two word characters
const TOKEN_PATTERN: &str = r"\b\w\w+\b";

const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
    "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can",
    "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do",
    "done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
    "for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here", "hereafter",
    "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his", "how", "however",
    "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into", "is", "it", "its",
    "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd", "made", "many", "may",
    "me", "meanwhile", "might", "mill", "mine", "more", "moreover", "most", "mostly", "move",
    "much", "must", "my", "myself", "name", "namely", "neither", "never", "nevertheless", "next",
    "nine", "no", "nobody", "none", "noone", "nor", "not", "nothing", "now", "nowhere", "of",
    "off", "often", "on", "once", "one", "only", "onto", "or", "other", "others", "otherwise",
    "our", "ours", "ourselves", "out", "over", "own", "part", "per", "perhaps", "please", "put",
    "rather", "re", "same", "see", "seem", "seemed", "seeming", "seems", "serious", "several",
    "she", "should", "show", "side", "since", "sincere", "six", "sixty", "so", "some", "somehow",
    "someone", "something", "sometime", "sometimes", "somewhere", "still", "such", "system",
    "take", "ten", "than", "that", "the", "their", "them", "themselves", "then", "thence",
    "there", "thereafter", "thereby", "therefore", "therein", "thereupon", "these", "they",
    "thick", "thin", "third", "this", "those", "though", "three", "through", "throughout",
    "thru", "thus", "to", "together", "too", "top", "toward", "towards", "twelve", "twenty",
    "two", "un", "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were",
    "what", "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
    "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "whither", "who",
    "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without", "would",
    "yet", "you", "your", "yours", "yourself", "yourselves",
];

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(TOKEN_PATTERN).expect("token pattern is valid"))
}

fn stop_words() -> &'static HashSet<&'static str> {
    static WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    WORDS.get_or_init(|| ENGLISH_STOP_WORDS.iter().copied().collect())
}

/// Lowercased terms of a document with English stop words removed
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let stop = stop_words();

    token_pattern()
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|term| !stop.contains(term))
        .map(str::to_string)
        .collect()
}

/// L2-normalized TF-IDF rows for every corpus document
///
/// Rows are index-aligned with `Corpus::documents()` and share one sorted
/// vocabulary fitted over the whole corpus.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    vocabulary: Vec<String>,
    ids: Vec<MovieId>,
    rows: Vec<Vec<f64>>,
    positions: HashMap<MovieId, usize>,
}

impl FeatureMatrix {
    /// Fits the vocabulary and idf weights over the corpus, then weights each document
    ///
    /// Term weight is raw count times smoothed idf, `ln((1 + n) / (1 + df)) + 1`.
    /// A document with no surviving terms gets an all-zero row.
    pub fn vectorize(corpus: &Corpus) -> Self {
        let tokenized: Vec<Vec<String>> = corpus
            .documents()
            .iter()
            .map(|doc| tokenize(&doc.text))
            .collect();

        let vocabulary: Vec<String> = tokenized
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let index: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (term.as_str(), i))
            .collect();

        let mut document_frequency = vec![0usize; vocabulary.len()];
        let mut counts = Vec::with_capacity(tokenized.len());
        for terms in &tokenized {
            let mut row = vec![0f64; vocabulary.len()];
            for term in terms {
                row[index[term.as_str()]] += 1.0;
            }
            for (df, &count) in document_frequency.iter_mut().zip(&row) {
                if count > 0.0 {
                    *df += 1;
                }
            }
            counts.push(row);
        }

        let n = tokenized.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let rows = counts
            .into_iter()
            .map(|mut row| {
                for (weight, w) in row.iter_mut().zip(&idf) {
                    *weight *= w;
                }
                normalize(&mut row);
                row
            })
            .collect();

        let ids: Vec<MovieId> = corpus.documents().iter().map(|doc| doc.id).collect();
        let positions = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();

        tracing::debug!(
            documents = ids.len(),
            terms = vocabulary.len(),
            "Fitted TF-IDF feature space"
        );

        Self {
            vocabulary,
            ids,
            rows,
            positions,
        }
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn ids(&self) -> &[MovieId] {
        &self.ids
    }

    pub fn row(&self, movie_id: MovieId) -> Option<&[f64]> {
        self.positions
            .get(&movie_id)
            .map(|&i| self.rows[i].as_slice())
    }
}

fn normalize(row: &mut [f64]) {
    let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        row.iter_mut().for_each(|v| *v /= norm);
    }
}
