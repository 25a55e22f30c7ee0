//! Per-document token statistics

use crate::source::RawDocument;
use crate::stopwords::Stopwords;
use crate::tokenizer::tokenize;
use std::collections::{BTreeSet, HashMap};

/// Arbitrary document metadata
pub type Metadata = HashMap<String, serde_json::Value>;

/// Token statistics for one document, computed once and never changed.
///
/// A document whose content is nothing but stopwords ends up with no terms
/// at all. Such a document is still part of the corpus (it counts towards
/// the number of documents used for IDF) but contributes nothing to the
/// index; see [`Document::is_degenerate`].
#[derive(Debug, Clone)]
pub struct Document {
    /// Opaque identifier, usually a file path
    pub identifier: String,
    /// Metadata supplied by the source
    pub metadata: Metadata,
    /// Every token in the content, in order, stopwords included
    pub tokens: Vec<String>,
    /// Tokens with stopwords removed
    pub raw_tokens: Vec<String>,
    /// Occurrences of each non-stopword token
    pub freq_map: HashMap<String, usize>,
    /// Highest count in `freq_map`, zero for a degenerate document
    pub freq_map_max: usize,
    /// Distinct non-stopword tokens
    pub terms: BTreeSet<String>,
}

impl Document {
    /// Tokenize `content` and compute its statistics
    pub fn new(
        content: &str,
        identifier: impl Into<String>,
        metadata: Metadata,
        stopwords: &Stopwords,
    ) -> Self {
        let (tokens, _) = tokenize(content);
        let raw_tokens: Vec<String> = stopwords.filter(tokens.iter().cloned()).collect();

        let mut freq_map: HashMap<String, usize> = HashMap::new();
        for token in &raw_tokens {
            *freq_map.entry(token.clone()).or_insert(0) += 1;
        }
        let freq_map_max = freq_map.values().copied().max().unwrap_or(0);
        let terms = raw_tokens.iter().cloned().collect();

        Document {
            identifier: identifier.into(),
            metadata,
            tokens,
            raw_tokens,
            freq_map,
            freq_map_max,
            terms,
        }
    }

    /// Build a document from a source payload
    pub fn from_raw(raw: RawDocument, stopwords: &Stopwords) -> Self {
        Self::new(&raw.content, raw.identifier, raw.metadata, stopwords)
    }

    /// True when no token survived stopword filtering
    pub fn is_degenerate(&self) -> bool {
        self.freq_map_max == 0
    }

    /// Occurrences of `term` in this document
    pub fn count(&self, term: &str) -> usize {
        self.freq_map.get(term).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stopwords() -> Stopwords {
        Stopwords::from_words(["the", "a", "on"])
    }

    #[test]
    fn test_document_statistics() {
        let doc = Document::new(
            "The cat sat on the mat. The cat purred.",
            "doc1",
            Metadata::new(),
            &stopwords(),
        );

        assert_eq!(doc.identifier, "doc1");
        assert_eq!(doc.tokens.len(), 9);
        assert_eq!(doc.raw_tokens, vec!["cat", "sat", "mat", "cat", "purred"]);
        assert_eq!(doc.count("cat"), 2);
        assert_eq!(doc.count("mat"), 1);
        assert_eq!(doc.count("the"), 0);
        assert_eq!(doc.freq_map_max, 2);
        assert_eq!(doc.terms.len(), 4);
        assert!(!doc.is_degenerate());
    }

    #[test]
    fn test_stopword_only_document_is_degenerate() {
        let doc = Document::new("the a on THE", "empty", Metadata::new(), &stopwords());

        assert_eq!(doc.tokens.len(), 4);
        assert!(doc.raw_tokens.is_empty());
        assert!(doc.freq_map.is_empty());
        assert!(doc.terms.is_empty());
        assert!(doc.is_degenerate());
    }

    #[test]
    fn test_from_raw_keeps_metadata() {
        let mut metadata = Metadata::new();
        metadata.insert("author".to_string(), serde_json::json!("someone"));

        let raw = RawDocument {
            identifier: "notes/a.txt".to_string(),
            content: "dogs bark".to_string(),
            metadata,
        };
        let doc = Document::from_raw(raw, &stopwords());

        assert_eq!(doc.identifier, "notes/a.txt");
        assert_eq!(doc.metadata["author"], "someone");
        assert_eq!(doc.terms.iter().collect::<Vec<_>>(), vec!["bark", "dogs"]);
    }
}
