//! The inverted index and its metadata
//!
//! The index maps each term to the documents containing it, and each of
//! those documents to the term's TF-IDF score. Ordered maps keep the
//! persisted form and every iteration over the index deterministic.

mod builder;

pub use builder::IndexBuilder;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Document identifier → score for a single term
pub type Postings = BTreeMap<String, f64>;

/// Term → document identifier → TF-IDF score
pub type Index = BTreeMap<String, Postings>;

/// Facts about an index, persisted alongside it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexMetadata {
    /// Number of distinct terms in the index
    pub uniq_words: usize,
    /// Number of documents the index was built from
    #[serde(default)]
    pub documents: usize,
    /// Whether smoothed TF and IDF were used
    #[serde(default)]
    pub smoothing: bool,
    /// Build time (RFC 3339, UTC)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub built_at: Option<String>,
}

impl IndexMetadata {
    /// Describe an index that was just built
    pub fn for_build(index: &Index, documents: usize, smoothing: bool) -> Self {
        IndexMetadata {
            uniq_words: index.len(),
            documents,
            smoothing,
            built_at: Some(Utc::now().to_rfc3339()),
        }
    }
}

/// Sum of each term's scores across all documents
pub fn word_scores(index: &Index) -> BTreeMap<String, f64> {
    index
        .iter()
        .map(|(term, postings)| (term.clone(), postings.values().sum()))
        .collect()
}

/// Re-orient the index as document identifier → term → score
pub fn by_document(index: &Index) -> BTreeMap<String, BTreeMap<String, f64>> {
    let mut documents: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    for (term, postings) in index {
        for (identifier, score) in postings {
            documents
                .entry(identifier.clone())
                .or_default()
                .insert(term.clone(), *score);
        }
    }
    documents
}

/// Inverse of [`by_document`]
pub fn from_documents(documents: BTreeMap<String, BTreeMap<String, f64>>) -> Index {
    let mut index = Index::new();
    for (identifier, scores) in documents {
        for (term, score) in scores {
            index.entry(term).or_default().insert(identifier.clone(), score);
        }
    }
    index
}
