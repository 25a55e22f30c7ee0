//! The TF-IDF engine
//!
//! An [`Engine`] owns one index at a time. The index is replaced wholesale
//! by [`Engine::build_index`] or [`Engine::load_index`] and never edited in
//! place, so a search always sees one consistent snapshot.

use crate::config::EngineConfig;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::index::{word_scores, Index, IndexBuilder, IndexMetadata};
use crate::keywords::determine_keywords;
use crate::search::{search, SearchResults};
use crate::sink::{open_sink, Sink};
use crate::source::{open_source, Source};
use crate::stopwords::Stopwords;
use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

/// Builds, persists and queries a TF-IDF index
pub struct Engine {
    config: EngineConfig,
    source: Option<Box<dyn Source>>,
    sink: Option<Box<dyn Sink>>,
    stopwords: Stopwords,
    builder: IndexBuilder,
    index: Index,
    metadata: IndexMetadata,
    loaded: bool,
}

impl Engine {
    /// Create an engine from a configuration.
    ///
    /// The configuration is validated, the stopword list loaded, and the
    /// configured source and sink opened.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let stopwords = match &config.stopwords {
            Some(path) => Stopwords::from_json_file(path)?,
            None => Stopwords::bundled()?,
        };
        let source = config.source.as_ref().map(open_source).transpose()?;
        let sink = config.sink.as_ref().map(open_sink).transpose()?;

        Ok(Self::with_parts(config, source, sink, stopwords))
    }

    /// Create an engine from already constructed parts.
    ///
    /// The `source` and `sink` sections of `config` are ignored.
    pub fn with_parts(
        config: EngineConfig,
        source: Option<Box<dyn Source>>,
        sink: Option<Box<dyn Sink>>,
        stopwords: Stopwords,
    ) -> Self {
        let builder = IndexBuilder::new(config.enforce_correct_smoothing);
        Engine {
            config,
            source,
            sink,
            stopwords,
            builder,
            index: Index::new(),
            metadata: IndexMetadata::default(),
            loaded: false,
        }
    }

    /// Read up to `limit` documents from the source and tokenize them.
    ///
    /// A limit of zero reads every document. Two documents with the same
    /// identifier are an error.
    pub fn process_documents(&self, limit: Option<usize>) -> Result<Vec<Document>> {
        let source = self.source.as_deref().ok_or(Error::NoSource)?;
        let limit = limit.filter(|&n| n > 0);

        let start = Instant::now();
        tracing::debug!("Reading and tokenizing documents");

        let mut documents = Vec::new();
        let mut seen = HashSet::new();
        for raw in source.documents(limit)? {
            match raw {
                Ok(raw) => {
                    if !seen.insert(raw.identifier.clone()) {
                        return Err(Error::Other(format!(
                            "Duplicate document identifier: {}",
                            raw.identifier
                        )));
                    }
                    documents.push(Document::from_raw(raw, &self.stopwords));
                }
                Err(err) if self.config.lenient => {
                    tracing::warn!("Skipping unreadable document: {}", err);
                }
                Err(err) => return Err(err),
            }
        }

        tracing::info!("Read {} documents", documents.len());
        tracing::debug!("Reading took {:.3}s", start.elapsed().as_secs_f64());

        Ok(documents)
    }

    /// Rebuild the index from up to `limit` source documents
    pub fn build_index(&mut self, limit: Option<usize>) -> Result<()> {
        let documents = self.process_documents(limit)?;
        let index = self.builder.build(&documents)?;

        self.metadata = IndexMetadata::for_build(&index, documents.len(), self.builder.smoothing());
        self.index = index;
        self.loaded = true;

        tracing::info!(
            "Index built: {} words from {} documents",
            self.metadata.uniq_words,
            self.metadata.documents
        );
        Ok(())
    }

    /// Rank documents for `query`, building the index first if needed
    pub fn search(&mut self, query: &str) -> Result<SearchResults> {
        if !self.loaded {
            self.build_index(None)?;
        }
        Ok(search(&self.index, query, &self.stopwords))
    }

    /// Rank the words of `text` by corpus-wide score, lowest first,
    /// building the index first if needed
    pub fn determine_keywords(&mut self, text: &str) -> Result<Vec<(String, f64)>> {
        if !self.loaded {
            self.build_index(None)?;
        }
        Ok(determine_keywords(&self.index, text))
    }

    /// Sum of each term's scores across all documents
    pub fn word_scores(&self) -> BTreeMap<String, f64> {
        word_scores(&self.index)
    }

    /// Refresh the metadata from the current index
    pub fn mould_metadata(&mut self) -> &IndexMetadata {
        self.metadata.uniq_words = self.index.len();
        &self.metadata
    }

    /// Replace the index with the one stored in the sink
    pub fn load_index(&mut self) -> Result<()> {
        let sink = self.sink.as_deref().ok_or(Error::NoSink)?;

        let start = Instant::now();
        let (index, metadata) = sink.load_index()?;

        self.index = index;
        self.metadata = metadata;
        self.loaded = true;

        tracing::info!(
            "Index loaded from {} in {:.3}s, {} words in index",
            sink.location(),
            start.elapsed().as_secs_f64(),
            self.index.len()
        );
        Ok(())
    }

    /// Store the current index in the sink
    pub fn save_index(&mut self) -> Result<()> {
        if !self.loaded {
            return Err(Error::IndexNotLoaded);
        }
        self.mould_metadata();

        let sink = self.sink.as_deref().ok_or(Error::NoSink)?;
        let start = Instant::now();
        sink.save_index(&self.index, &self.metadata)?;

        tracing::info!(
            "Index saved to {} in {:.3}s",
            sink.location(),
            start.elapsed().as_secs_f64()
        );
        Ok(())
    }

    /// Bytes the persisted index occupies in the sink
    pub fn index_size(&self) -> Result<Option<u64>> {
        self.sink.as_deref().ok_or(Error::NoSink)?.size()
    }

    /// The current index
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Metadata of the current index
    pub fn metadata(&self) -> &IndexMetadata {
        &self.metadata
    }

    /// Whether an index has been built or loaded
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The stopwords in use
    pub fn stopwords(&self) -> &Stopwords {
        &self.stopwords
    }

    /// The engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The sink, if one is configured
    pub fn sink(&self) -> Option<&dyn Sink> {
        self.sink.as_deref()
    }
}
