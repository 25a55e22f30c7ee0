//! Engine configuration
//!
//! Every recognized option lives in [`EngineConfig`]. A configuration is
//! validated once, when the engine is constructed, so problems such as a
//! missing corpus directory surface before any document is read.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where documents come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    /// Files of a directory on disk
    Directory {
        /// Directory to read
        path: PathBuf,
        /// Glob patterns to include (empty includes everything)
        #[serde(default)]
        patterns: Vec<String>,
        /// Glob patterns to exclude
        #[serde(default)]
        exclude: Vec<String>,
        /// Descend into subdirectories
        #[serde(default)]
        recursive: bool,
    },
}

impl SourceConfig {
    /// A flat directory source with no filters
    pub fn directory<P: Into<PathBuf>>(path: P) -> Self {
        SourceConfig::Directory {
            path: path.into(),
            patterns: Vec::new(),
            exclude: Vec::new(),
            recursive: false,
        }
    }
}

/// Where the index is persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SinkConfig {
    /// A single JSON file
    Json {
        /// Path to the JSON file
        path: PathBuf,
    },
    /// A SQLite database
    Database {
        /// Path to the database file
        path: PathBuf,
    },
}

impl SinkConfig {
    /// Storage kind of this sink
    pub fn kind(&self) -> SinkKind {
        match self {
            SinkConfig::Json { .. } => SinkKind::Json,
            SinkConfig::Database { .. } => SinkKind::Database,
        }
    }

    /// Path of the persisted index
    pub fn path(&self) -> &Path {
        match self {
            SinkConfig::Json { path } | SinkConfig::Database { path } => path,
        }
    }
}

/// Storage kind for a persisted index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SinkKind {
    /// JSON file (default)
    #[default]
    Json,
    /// SQLite database
    Database,
}

impl SinkKind {
    /// Default file location for this kind of index
    pub fn default_path(self) -> PathBuf {
        match self {
            SinkKind::Json => crate::default_index_path(),
            SinkKind::Database => crate::default_db_path(),
        }
    }

    /// Sink configuration for `path`
    pub fn config<P: Into<PathBuf>>(self, path: P) -> SinkConfig {
        match self {
            SinkKind::Json => SinkConfig::Json { path: path.into() },
            SinkKind::Database => SinkConfig::Database { path: path.into() },
        }
    }
}

impl std::str::FromStr for SinkKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(SinkKind::Json),
            "db" | "database" | "sqlite" => Ok(SinkKind::Database),
            _ => Err(Error::ConfigError(format!("Invalid sink type: {}", s))),
        }
    }
}

/// Configuration for an [`Engine`](crate::Engine)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Smooth TF (`+0.5` on the maximum count) and IDF (`+1` on the
    /// document frequency)
    pub enforce_correct_smoothing: bool,
    /// Skip documents the source fails to read instead of aborting the build
    pub lenient: bool,
    /// JSON list of stopwords replacing the bundled one
    pub stopwords: Option<PathBuf>,
    /// Document source
    pub source: Option<SourceConfig>,
    /// Index sink
    pub sink: Option<SinkConfig>,
}

impl EngineConfig {
    /// Load a configuration from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::ConfigError(format!(
                "Cannot read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_yaml_str(&text)
    }

    /// Parse a configuration from YAML text
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Set the document source
    pub fn with_source(mut self, source: SourceConfig) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the index sink
    pub fn with_sink(mut self, sink: SinkConfig) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Enable or disable smoothing
    pub fn with_smoothing(mut self, smoothing: bool) -> Self {
        self.enforce_correct_smoothing = smoothing;
        self
    }

    /// Check the configuration before use
    pub fn validate(&self) -> Result<()> {
        if self.source.is_none() && self.sink.is_none() {
            return Err(Error::ConfigError(
                "either a source or a sink must be provided".to_string(),
            ));
        }

        if let Some(SourceConfig::Directory { path, .. }) = &self.source {
            if !path.is_dir() {
                return Err(Error::ConfigError(format!(
                    "Corpus directory does not exist: {}",
                    path.display()
                )));
            }
        }

        if let Some(sink) = &self.sink {
            if sink.path().as_os_str().is_empty() {
                return Err(Error::ConfigError("Index path is empty".to_string()));
            }
        }

        if let Some(path) = &self.stopwords {
            if !path.is_file() {
                return Err(Error::ConfigError(format!(
                    "Stopword file does not exist: {}",
                    path.display()
                )));
            }
        }

        Ok(())
    }
}
