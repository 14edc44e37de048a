//! Term frequency / inverse document frequency scoring.
//!
//! Documents are lower-cased, split on anything that is not a letter, digit
//! or underscore, and stripped of English stopwords. Term frequency is the raw
//! count; `idf(t) = 1 + ln(N / (1 + df(t)))`, which stays positive for any
//! non-empty corpus.

use std::collections::HashMap;

const STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "all", "also", "am", "an", "and", "another", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "came", "can", "cannot", "come", "could", "did", "do", "does", "doing",
    "down", "during", "each", "few", "for", "from", "further", "get", "got", "had", "has",
    "have", "he", "her", "here", "him", "himself", "his", "how", "i", "if", "in", "into",
    "is", "it", "its", "itself", "just", "like", "make", "many", "me", "might", "more",
    "most", "much", "must", "my", "never", "no", "nor", "not", "now", "of", "off", "on",
    "once", "only", "or", "other", "our", "out", "over", "own", "said", "same", "see",
    "should", "since", "so", "some", "still", "such", "take", "than", "that", "the",
    "their", "them", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "under", "until", "up", "very", "was", "way", "we", "well", "were", "what",
    "when", "where", "which", "while", "who", "why", "will", "with", "would", "you",
    "your", "a", "b", "c", "d", "e", "f", "g", "h", "j", "k", "l", "m", "n", "o", "p",
    "q", "r", "s", "t", "u", "v", "w", "x", "y", "z",
];

/// Lower-case and split on non-word characters
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// A fixed corpus of term-count documents
#[derive(Debug, Default, Clone)]
pub struct TfIdf {
    documents: Vec<HashMap<String, usize>>,
}

impl TfIdf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_document(&mut self, text: &str) {
        let mut counts = HashMap::new();
        for token in tokenize(text) {
            if !is_stopword(&token) {
                *counts.entry(token).or_insert(0) += 1;
            }
        }
        self.documents.push(counts);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn tf(&self, term: &str, doc: usize) -> usize {
        self.documents
            .get(doc)
            .and_then(|counts| counts.get(term))
            .copied()
            .unwrap_or(0)
    }

    pub fn idf(&self, term: &str) -> f64 {
        let n = self.documents.len() as f64;
        let df = self
            .documents
            .iter()
            .filter(|counts| counts.contains_key(term))
            .count() as f64;
        1.0 + (n / (1.0 + df)).ln()
    }

    /// Scores for every document in insertion order.
    /// Repeated query terms count once per occurrence.
    pub fn scores(&self, query: &str) -> Vec<f64> {
        let terms = tokenize(query);
        let idf: HashMap<&str, f64> = terms
            .iter()
            .map(|term| (term.as_str(), self.idf(term)))
            .collect();

        (0..self.documents.len())
            .map(|doc| {
                terms
                    .iter()
                    .map(|term| self.tf(term, doc) as f64 * idf[term.as_str()])
                    .sum()
            })
            .collect()
    }
}
