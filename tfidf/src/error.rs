//! Error types for the TF-IDF engine

use std::path::PathBuf;
use thiserror::Error;

/// TF-IDF error type
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration file could not be parsed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The source produced no documents to index
    #[error("Cannot build an index from an empty corpus")]
    EmptyCorpus,

    /// No persisted index exists at the given location
    #[error("Index not found: {}", .0.display())]
    IndexNotFound(PathBuf),

    /// An operation needed a built or loaded index
    #[error("No index is loaded. Build or load an index first")]
    IndexNotLoaded,

    /// The engine was asked to read documents without a source
    #[error("No document source has been configured")]
    NoSource,

    /// The engine was asked to persist or load without a sink
    #[error("No index sink has been configured")]
    NoSink,

    /// A numeric invariant of the scoring formulas was violated
    #[error("Numeric error: {0}")]
    Numeric(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for TF-IDF operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<glob::PatternError> for Error {
    fn from(err: glob::PatternError) -> Self {
        Error::ConfigError(format!("Invalid glob pattern: {}", err))
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::Io(err.into())
    }
}
