//! Directory source: every text file in a directory is a document

use super::{Documents, RawDocument, Source};
use crate::document::Metadata;
use crate::error::{Error, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Reads documents from the files of a directory.
///
/// Only the top level is read unless [`recursive`](Self::recursive) is set.
/// Hidden entries (such as `.git`), empty files and binary files are
/// skipped. Files are visited in file-name order.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    /// Root directory to read
    root: PathBuf,
    /// Include patterns (glob)
    patterns: Vec<Pattern>,
    /// Exclude patterns (glob)
    exclude: Vec<Pattern>,
    /// Descend into subdirectories
    recursive: bool,
}

impl DirectorySource {
    /// Create a source over `root`, keeping files that match any of
    /// `patterns` (all files when empty) and none of `exclude`
    pub fn new<P: AsRef<Path>>(root: P, patterns: &[&str], exclude: &[&str]) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        let patterns = patterns
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let exclude = exclude
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(DirectorySource {
            root,
            patterns,
            exclude,
            recursive: false,
        })
    }

    /// Descend into subdirectories
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// The directory being read
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read one file, returning `None` when it should not be indexed
    fn read(&self, entry: &DirEntry) -> Result<Option<RawDocument>> {
        let bytes = std::fs::read(entry.path())?;

        if bytes.is_empty() {
            tracing::debug!("Skipping empty file {}", entry.path().display());
            return Ok(None);
        }
        if crate::is_binary(&bytes) {
            tracing::debug!("Skipping binary file {}", entry.path().display());
            return Ok(None);
        }

        let content = String::from_utf8_lossy(&bytes).into_owned();

        let mut metadata = Metadata::new();
        if let Some(name) = entry.file_name().to_str() {
            metadata.insert("file_name".to_string(), name.into());
        }

        Ok(Some(RawDocument {
            identifier: entry.path().to_string_lossy().into_owned(),
            content,
            metadata,
        }))
    }

    /// Check if a path matches any include pattern
    fn matches(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return true;
        }

        let relative = path
            .strip_prefix(&self.root)
            .map(|p| p.to_string_lossy())
            .unwrap_or_default();

        let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

        // Normalize path separators for cross-platform compatibility
        let relative_normalized = relative.replace('\\', "/");

        let options = glob::MatchOptions {
            case_sensitive: false,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };

        self.patterns.iter().any(|p| {
            // "**/x" also matches "x" at the top level
            if let Some(suffix) = p.as_str().strip_prefix("**/") {
                if let Ok(suffix_pattern) = Pattern::new(suffix) {
                    if suffix_pattern.matches_with(filename, options)
                        || suffix_pattern.matches_with(&relative_normalized, options)
                    {
                        return true;
                    }
                }
            }

            p.matches_with(&relative_normalized, options) || p.matches_with(filename, options)
        })
    }

    /// Check if a path should be excluded
    fn is_excluded(&self, path: &Path) -> bool {
        // Never exclude the root directory itself
        if path == self.root {
            return false;
        }

        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if name.starts_with('.') {
            return true;
        }

        let relative = path
            .strip_prefix(&self.root)
            .map(|p| p.to_string_lossy())
            .unwrap_or_default();

        self.exclude.iter().any(|p| p.matches(&relative))
    }
}

impl Source for DirectorySource {
    fn documents(&self, limit: Option<usize>) -> Result<Documents<'_>> {
        if !self.root.is_dir() {
            return Err(Error::ConfigError(format!(
                "Not a directory: {}",
                self.root.display()
            )));
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e.path()));

        let documents = walker
            .filter_map(|entry| match entry {
                Ok(entry) if !entry.file_type().is_file() => None,
                Ok(entry) if !self.matches(entry.path()) => None,
                Ok(entry) => self.read(&entry).transpose(),
                Err(err) => Some(Err(err.into())),
            })
            .take(limit.unwrap_or(usize::MAX));

        Ok(Box::new(documents))
    }
}
