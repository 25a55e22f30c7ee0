//! Index sinks
//!
//! A sink persists a built index together with its metadata and loads it
//! back. Whatever the storage format, the index handed to and returned from
//! a sink is oriented term → document → score.

mod database;
mod json;
mod schema;

pub use database::DatabaseSink;
pub use json::JsonSink;
pub use schema::SCHEMA_VERSION;

use crate::config::SinkConfig;
use crate::error::{Error, Result};
use crate::index::{Index, IndexMetadata};
use std::cell::RefCell;
use std::path::PathBuf;

/// Persistent storage for an index
pub trait Sink {
    /// Load a previously saved index.
    ///
    /// Fails with [`Error::IndexNotFound`] when nothing has been saved yet.
    fn load_index(&self) -> Result<(Index, IndexMetadata)>;

    /// Replace whatever was saved before with `index` and `metadata`
    fn save_index(&self, index: &Index, metadata: &IndexMetadata) -> Result<()>;

    /// Human-readable location, for messages
    fn location(&self) -> String;

    /// Bytes the saved index occupies, `None` when nothing is stored on disk
    fn size(&self) -> Result<Option<u64>>;
}

/// A sink that keeps the saved index in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    saved: RefCell<Option<(Index, IndexMetadata)>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sink for MemorySink {
    fn load_index(&self) -> Result<(Index, IndexMetadata)> {
        self.saved
            .borrow()
            .clone()
            .ok_or_else(|| Error::IndexNotFound(PathBuf::from(self.location())))
    }

    fn save_index(&self, index: &Index, metadata: &IndexMetadata) -> Result<()> {
        *self.saved.borrow_mut() = Some((index.clone(), metadata.clone()));
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }

    fn size(&self) -> Result<Option<u64>> {
        Ok(None)
    }
}

/// Create the sink described by `config`
pub fn open_sink(config: &SinkConfig) -> Result<Box<dyn Sink>> {
    match config {
        SinkConfig::Json { path } => Ok(Box::new(JsonSink::new(path))),
        SinkConfig::Database { path } => Ok(Box::new(DatabaseSink::open(path)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SinkKind;
    use tempfile::tempdir;

    #[test]
    fn test_memory_sink_round_trip() {
        let sink = MemorySink::new();
        assert!(sink.load_index().is_err());

        let mut index = Index::new();
        index
            .entry("cat".to_string())
            .or_default()
            .insert("a".to_string(), 0.5);
        let metadata = IndexMetadata {
            uniq_words: 1,
            ..Default::default()
        };

        sink.save_index(&index, &metadata).unwrap();
        assert_eq!(sink.load_index().unwrap(), (index, metadata));
        assert_eq!(sink.size().unwrap(), None);
    }

    #[test]
    fn test_open_sink_by_kind() {
        let dir = tempdir().unwrap();

        let json = open_sink(&SinkKind::Json.config(dir.path().join("index.json"))).unwrap();
        assert!(json.location().ends_with("index.json"));

        let db = open_sink(&SinkKind::Database.config(dir.path().join("index.sqlite"))).unwrap();
        assert!(db.location().ends_with("index.sqlite"));
    }
}
