//! Stopword filtering
//!
//! The stopword set is loaded once, before the first document is indexed,
//! and never changes afterwards. Indexing and querying both consult the same
//! `Stopwords` value held by the engine.

use crate::error::Result;
use std::collections::HashSet;
use std::path::Path;

/// English stopwords shipped with the crate
const BUNDLED_STOPWORDS: &str = include_str!("../resources/stopwords.json");

/// An immutable set of words excluded from indexing and queries.
///
/// Words are matched exactly, so they must already be lowercase, which is
/// what the tokenizer produces.
#[derive(Debug, Clone, Default)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// Load the bundled English stopword list
    pub fn bundled() -> Result<Self> {
        Self::from_json_str(BUNDLED_STOPWORDS)
    }

    /// Build a stopword set from an explicit word list
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Stopwords {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Parse a JSON array of strings
    pub fn from_json_str(json: &str) -> Result<Self> {
        let words: Vec<String> = serde_json::from_str(json)?;
        Ok(Self::from_words(words))
    }

    /// Load a JSON array of strings from a file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check whether `word` is a stopword
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Yield only the words that are not stopwords
    pub fn filter<'a, I>(&'a self, words: I) -> impl Iterator<Item = I::Item> + 'a
    where
        I: IntoIterator,
        I::IntoIter: 'a,
        I::Item: AsRef<str>,
    {
        words
            .into_iter()
            .filter(move |word| !self.contains(word.as_ref()))
    }

    /// Number of stopwords
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
