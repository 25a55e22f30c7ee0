//! Document sources
//!
//! A source hands the engine raw documents to index. The engine never cares
//! where they come from; it only iterates what [`Source::documents`] yields.

mod directory;

pub use directory::DirectorySource;

use crate::config::SourceConfig;
use crate::document::Metadata;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A document as produced by a source, before tokenization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    /// Opaque identifier, usually a path
    pub identifier: String,
    /// Full text content
    pub content: String,
    /// Arbitrary metadata
    #[serde(default)]
    pub metadata: Metadata,
}

impl RawDocument {
    /// Create a document with empty metadata
    pub fn new(identifier: impl Into<String>, content: impl Into<String>) -> Self {
        RawDocument {
            identifier: identifier.into(),
            content: content.into(),
            metadata: Metadata::new(),
        }
    }
}

/// Iterator over the documents of one [`Source::documents`] call
pub type Documents<'a> = Box<dyn Iterator<Item = Result<RawDocument>> + 'a>;

/// Something that can enumerate documents to index.
///
/// Each call starts a fresh, finite pass. The order is up to the source but
/// must not change within a call. `limit` caps the number of documents
/// yielded; `None` means all of them. Identifiers must be unique within a
/// call; the engine refuses to index duplicates.
pub trait Source {
    /// Enumerate up to `limit` documents
    fn documents(&self, limit: Option<usize>) -> Result<Documents<'_>>;
}

/// A source over documents held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: Vec<RawDocument>,
}

impl MemorySource {
    /// Create a source over `documents`
    pub fn new(documents: Vec<RawDocument>) -> Self {
        MemorySource { documents }
    }

    /// Build a source from `(identifier, content)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        MemorySource {
            documents: pairs
                .into_iter()
                .map(|(identifier, content)| RawDocument::new(identifier, content))
                .collect(),
        }
    }
}

impl Source for MemorySource {
    fn documents(&self, limit: Option<usize>) -> Result<Documents<'_>> {
        let limit = limit.unwrap_or(usize::MAX);
        Ok(Box::new(self.documents.iter().take(limit).cloned().map(Ok::<_, Error>)))
    }
}

/// Create the source described by `config`
pub fn open_source(config: &SourceConfig) -> Result<Box<dyn Source>> {
    match config {
        SourceConfig::Directory {
            path,
            patterns,
            exclude,
            recursive,
        } => {
            let patterns: Vec<&str> = patterns.iter().map(|s| s.as_str()).collect();
            let exclude: Vec<&str> = exclude.iter().map(|s| s.as_str()).collect();
            let source = DirectorySource::new(path, &patterns, &exclude)?.recursive(*recursive);
            Ok(Box::new(source))
        }
    }
}
