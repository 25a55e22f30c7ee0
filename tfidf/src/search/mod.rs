//! Query scoring against a built index

mod normalize;

pub use normalize::normalize;

use crate::index::Index;
use crate::stopwords::Stopwords;
use crate::tokenizer::tokenize;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Score of one document for one query
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredResult {
    /// Score after the coverage penalty
    pub score: f64,
    /// Score before the coverage penalty
    pub original: f64,
    /// `1.0` for a full match, otherwise the fraction of query words missing
    pub diff: f64,
    /// Query words found in the document
    pub words_contained: BTreeSet<String>,
}

/// Ranked output of a search
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    /// Distinct, stopword-filtered query words
    pub query: BTreeSet<String>,
    /// Document identifier and score, best first
    pub results: Vec<(String, ScoredResult)>,
    /// Query words absent from the index
    pub words_not_found: BTreeSet<String>,
}

impl SearchResults {
    /// Number of scored documents
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether no document matched
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Iterate over `(identifier, result)` pairs, best first
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScoredResult)> {
        self.results.iter().map(|(id, result)| (id.as_str(), result))
    }
}

/// Turn a query string into its distinct, non-stopword words
pub fn query_words(query: &str, stopwords: &Stopwords) -> BTreeSet<String> {
    let (tokens, _) = tokenize(query);
    stopwords.filter(tokens).collect()
}

/// Score every document containing at least one query word.
///
/// Repeated query words count once. Results are ordered by adjusted score,
/// highest first, with ties broken by identifier.
pub fn search(index: &Index, query: &str, stopwords: &Stopwords) -> SearchResults {
    let words = query_words(query, stopwords);
    tracing::debug!("Querying with: {:?}", words);

    let mut scores: BTreeMap<String, ScoredResult> = BTreeMap::new();
    let mut words_not_found = BTreeSet::new();

    for word in &words {
        match index.get(word) {
            Some(postings) => {
                for (identifier, score) in postings {
                    let entry = scores.entry(identifier.clone()).or_default();
                    entry.score += score;
                    entry.words_contained.insert(word.clone());
                }
            }
            None => {
                words_not_found.insert(word.clone());
            }
        }
    }

    if !words_not_found.is_empty() {
        tracing::warn!("Words not in index: {:?}", words_not_found);
    }
    tracing::debug!("Relevant documents: {}", scores.len());

    normalize(&words, &mut scores);

    let mut results: Vec<(String, ScoredResult)> = scores.into_iter().collect();
    results.sort_by(|(a_id, a), (b_id, b)| {
        b.score.total_cmp(&a.score).then_with(|| a_id.cmp(b_id))
    });

    SearchResults {
        query: words,
        results,
        words_not_found,
    }
}
