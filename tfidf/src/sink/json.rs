//! JSON file sink

use super::Sink;
use crate::error::{Error, Result};
use crate::index::{Index, IndexMetadata};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// On-disk layout: `{"index": {...}, "metadata": {...}}`
#[derive(Serialize, Deserialize)]
struct PersistedIndex {
    index: Index,
    metadata: IndexMetadata,
}

/// Borrowed form of [`PersistedIndex`] for writing
#[derive(Serialize)]
struct PersistedIndexRef<'a> {
    index: &'a Index,
    metadata: &'a IndexMetadata,
}

/// Persists the index as a single pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    /// Create a sink writing to `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        JsonSink {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the JSON file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file written before being renamed over the real one
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Sink for JsonSink {
    fn load_index(&self) -> Result<(Index, IndexMetadata)> {
        if !self.path.exists() {
            return Err(Error::IndexNotFound(self.path.clone()));
        }

        let text = std::fs::read_to_string(&self.path)?;
        let persisted: PersistedIndex = serde_json::from_str(&text)?;

        tracing::debug!(
            "Loaded {} terms from {}",
            persisted.index.len(),
            self.path.display()
        );
        Ok((persisted.index, persisted.metadata))
    }

    fn save_index(&self, index: &Index, metadata: &IndexMetadata) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&PersistedIndexRef { index, metadata })?;

        let temp = self.temp_path();
        std::fs::write(&temp, json)?;
        std::fs::rename(&temp, &self.path)?;

        tracing::debug!("Saved {} terms to {}", index.len(), self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn size(&self) -> Result<Option<u64>> {
        match std::fs::metadata(&self.path) {
            Ok(metadata) => Ok(Some(metadata.len())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
