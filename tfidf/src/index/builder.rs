//! TF-IDF index construction

use super::Index;
use crate::document::Document;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::time::Instant;

/// Computes TF-IDF scores for a corpus of documents.
///
/// Without smoothing:
///
/// - `TF(t, D) = count(t, D) / max_count(D)`
/// - `IDF(t) = ln(N / df(t))`
///
/// With smoothing, `0.5` is added to `max_count(D)` and `1` to `df(t)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexBuilder {
    smoothing: bool,
}

impl IndexBuilder {
    /// Create a builder, optionally with smoothed TF and IDF
    pub fn new(smoothing: bool) -> Self {
        IndexBuilder { smoothing }
    }

    /// Whether smoothing is enabled
    pub fn smoothing(&self) -> bool {
        self.smoothing
    }

    /// Count how many documents contain each term
    pub fn document_frequencies(documents: &[Document]) -> HashMap<&str, usize> {
        let mut frequencies: HashMap<&str, usize> = HashMap::new();
        for document in documents {
            for term in &document.terms {
                *frequencies.entry(term.as_str()).or_insert(0) += 1;
            }
        }
        frequencies
    }

    /// Term frequency of `term` in `document`, normalized by the document's
    /// most frequent term
    pub fn term_frequency(&self, term: &str, document: &Document) -> f64 {
        let mut maximum = document.freq_map_max as f64;
        if self.smoothing {
            maximum += 0.5;
        }
        if maximum == 0.0 {
            return 0.0;
        }
        document.count(term) as f64 / maximum
    }

    /// Inverse document frequency of a term found in `document_frequency`
    /// of `total_documents` documents
    pub fn inverse_document_frequency(
        &self,
        document_frequency: usize,
        total_documents: usize,
    ) -> Result<f64> {
        let mut denominator = document_frequency as f64;
        if self.smoothing {
            denominator += 1.0;
        }
        if denominator == 0.0 {
            return Err(Error::Numeric(
                "inverse document frequency of a term found in no documents".to_string(),
            ));
        }
        if total_documents == 0 {
            return Err(Error::EmptyCorpus);
        }
        Ok((total_documents as f64 / denominator).ln())
    }

    /// Build the index for `documents`.
    ///
    /// Every document counts towards N, but degenerate documents (nothing
    /// left after stopword filtering) add no terms.
    pub fn build(&self, documents: &[Document]) -> Result<Index> {
        let total = documents.len();
        if total == 0 {
            return Err(Error::EmptyCorpus);
        }

        tracing::debug!("Building document frequency table");
        let frequencies = Self::document_frequencies(documents);

        let start = Instant::now();
        tracing::debug!("Computing word relevancy for {} documents", total);

        let mut idf_cache: HashMap<&str, f64> = HashMap::with_capacity(frequencies.len());
        let mut index = Index::new();

        for document in documents {
            if document.is_degenerate() {
                tracing::debug!(
                    "Document {} has no terms after stopword filtering, skipping",
                    document.identifier
                );
                continue;
            }

            for term in &document.terms {
                let term = term.as_str();
                let idf = match idf_cache.get(term) {
                    Some(idf) => *idf,
                    None => {
                        let document_frequency = frequencies.get(term).copied().unwrap_or(0);
                        let idf = self.inverse_document_frequency(document_frequency, total)?;
                        idf_cache.insert(term, idf);
                        idf
                    }
                };

                let score = self.term_frequency(term, document) * idf;
                index
                    .entry(term.to_string())
                    .or_default()
                    .insert(document.identifier.clone(), score);
            }
        }

        tracing::debug!(
            "Computed {} terms in {:.3}s",
            index.len(),
            start.elapsed().as_secs_f64()
        );

        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Metadata;
    use crate::stopwords::Stopwords;

    fn corpus(texts: &[(&str, &str)]) -> Vec<Document> {
        let stopwords = Stopwords::from_words(["the"]);
        texts
            .iter()
            .map(|(id, text)| Document::new(text, *id, Metadata::new(), &stopwords))
            .collect()
    }

    #[test]
    fn test_scores_follow_formula() {
        let documents = corpus(&[("a", "cat cat dog"), ("b", "dog bird"), ("c", "fish")]);
        let index = IndexBuilder::new(false).build(&documents).unwrap();

        // cat: tf = 2/2 in a, df = 1 of 3
        assert_eq!(index["cat"]["a"], 1.0 * (3.0f64 / 1.0).ln());
        // dog: tf = 1/2 in a, 1/1 in b, df = 2 of 3
        assert_eq!(index["dog"]["a"], 0.5 * (3.0f64 / 2.0).ln());
        assert_eq!(index["dog"]["b"], 1.0 * (3.0f64 / 2.0).ln());
        assert_eq!(index["fish"]["c"], (3.0f64).ln());
        assert!(!index["cat"].contains_key("b"));
    }

    #[test]
    fn test_smoothed_scores() {
        let documents = corpus(&[("a", "cat cat dog"), ("b", "dog")]);
        let index = IndexBuilder::new(true).build(&documents).unwrap();

        assert_eq!(index["cat"]["a"], (2.0 / 2.5) * (2.0f64 / 2.0).ln());
        assert_eq!(index["dog"]["b"], (1.0 / 1.5) * (2.0f64 / 3.0).ln());
    }

    #[test]
    fn test_empty_corpus_is_error() {
        let result = IndexBuilder::default().build(&[]);
        assert!(matches!(result, Err(Error::EmptyCorpus)));
    }

    #[test]
    fn test_zero_document_frequency_is_error() {
        let builder = IndexBuilder::new(false);
        assert!(matches!(
            builder.inverse_document_frequency(0, 3),
            Err(Error::Numeric(_))
        ));

        let smoothed = IndexBuilder::new(true);
        assert_eq!(
            smoothed.inverse_document_frequency(0, 3).unwrap(),
            3.0f64.ln()
        );
    }

    #[test]
    fn test_degenerate_document_adds_no_terms() {
        let documents = corpus(&[("only-stopwords", "the the THE")]);
        let index = IndexBuilder::default().build(&documents).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_degenerate_document_counts_towards_n() {
        let documents = corpus(&[("a", "cat"), ("b", "the")]);
        let index = IndexBuilder::default().build(&documents).unwrap();
        assert_eq!(index["cat"]["a"], 2.0f64.ln());
    }

    #[test]
    fn test_build_is_idempotent() {
        let documents = corpus(&[("a", "one two two three"), ("b", "two three four")]);
        let builder = IndexBuilder::default();

        let first = builder.build(&documents).unwrap();
        let second = builder.build(&documents).unwrap();

        for (term, postings) in &first {
            for (doc, score) in postings {
                assert_eq!(score.to_bits(), second[term][doc].to_bits());
            }
        }
        assert_eq!(first, second);
    }
}
