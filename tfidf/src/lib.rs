//! # TF-IDF
//!
//! Relevance-ranked search over a corpus of text documents using term
//! frequency–inverse document frequency weighting.
//!
//! The crate provides:
//! - **Tokenizing** and stopword filtering of documents and queries
//! - **Index building**: term → document → TF-IDF score
//! - **Search** with a coverage penalty for partially matching documents
//! - **Keyword extraction** ranking a text's words by corpus-wide rarity
//! - **Sources** (directory, in-memory) and **sinks** (JSON, SQLite)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tfidf::{Engine, EngineConfig, SinkKind, SourceConfig};
//!
//! let config = EngineConfig::default()
//!     .with_source(SourceConfig::directory("stories"))
//!     .with_sink(SinkKind::Json.config("index.json"));
//!
//! let mut engine = Engine::new(config).unwrap();
//! engine.build_index(None).unwrap();
//! engine.save_index().unwrap();
//!
//! for (identifier, result) in engine.search("dragon castle").unwrap().iter() {
//!     println!("{} {:.5}", identifier, result.score);
//! }
//! ```

pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod index;
pub mod keywords;
pub mod search;
pub mod sink;
pub mod source;
pub mod stopwords;
pub mod tokenizer;

// Re-exports for convenience
pub use config::{EngineConfig, SinkConfig, SinkKind, SourceConfig};
pub use document::{Document, Metadata};
pub use engine::Engine;
pub use error::{Error, Result};
pub use index::{Index, IndexBuilder, IndexMetadata};
pub use search::{ScoredResult, SearchResults};
pub use sink::{DatabaseSink, JsonSink, MemorySink, Sink};
pub use source::{DirectorySource, MemorySource, RawDocument, Source};
pub use stopwords::Stopwords;
pub use tokenizer::tokenize;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory holding the default index files
fn default_cache_dir() -> std::path::PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("tfidf")
}

/// Default JSON index path
pub fn default_index_path() -> std::path::PathBuf {
    default_cache_dir().join("index.json")
}

/// Default database path
pub fn default_db_path() -> std::path::PathBuf {
    default_cache_dir().join("index.sqlite")
}

/// Detect if content is binary using NUL-byte check (ripgrep strategy)
pub fn is_binary(content: &[u8]) -> bool {
    // Check first 8KB for NUL bytes
    content.iter().take(8192).any(|&b| b == 0)
}
