//! SQLite sink
//!
//! Rows are keyed by document identifier, each holding that document's
//! term → score map as JSON. Loading transposes the rows back into the
//! term-oriented index. Index metadata is kept in `index_state`.

use super::{schema, Sink};
use crate::error::{Error, Result};
use crate::index::{by_document, from_documents, Index, IndexMetadata};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Key of the metadata row in `index_state`
const METADATA_KEY: &str = "metadata";

/// Persists the index in a SQLite database
pub struct DatabaseSink {
    conn: Connection,
    path: PathBuf,
}

impl DatabaseSink {
    /// Open or create a database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        schema::ensure_schema(&conn)?;

        Ok(DatabaseSink { conn, path })
    }

    /// Open an in-memory database (for testing)
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::ensure_schema(&conn)?;
        Ok(DatabaseSink {
            conn,
            path: PathBuf::from(":memory:"),
        })
    }

    /// Get the database path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of documents stored
    pub fn count_documents(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM search_index", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Scores of a single document, if it is stored
    pub fn document_scores(&self, identifier: &str) -> Result<Option<BTreeMap<String, f64>>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT index_dict FROM search_index WHERE identifier = ?1",
                [identifier],
                |row| row.get(0),
            )
            .optional()?;

        json.map(|json| serde_json::from_str(&json).map_err(Error::from))
            .transpose()
    }
}

impl Sink for DatabaseSink {
    fn load_index(&self) -> Result<(Index, IndexMetadata)> {
        let metadata_json: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM index_state WHERE key = ?1",
                [METADATA_KEY],
                |row| row.get(0),
            )
            .optional()?;

        let Some(metadata_json) = metadata_json else {
            return Err(Error::IndexNotFound(self.path.clone()));
        };
        let metadata: IndexMetadata = serde_json::from_str(&metadata_json)?;

        let mut stmt = self
            .conn
            .prepare("SELECT identifier, index_dict FROM search_index")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut documents = BTreeMap::new();
        for (identifier, json) in rows {
            let scores: BTreeMap<String, f64> = serde_json::from_str(&json)?;
            documents.insert(identifier, scores);
        }

        tracing::debug!(
            "Loaded {} documents from {}",
            documents.len(),
            self.path.display()
        );
        Ok((from_documents(documents), metadata))
    }

    fn save_index(&self, index: &Index, metadata: &IndexMetadata) -> Result<()> {
        let documents = by_document(index);
        let metadata_json = serde_json::to_string(metadata)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM search_index", [])?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO search_index (identifier, index_dict) VALUES (?1, ?2)")?;
            for (identifier, scores) in &documents {
                let json = serde_json::to_string(scores)?;
                stmt.execute(params![identifier, json])?;
            }
        }
        tx.execute(
            "INSERT OR REPLACE INTO index_state (key, value) VALUES (?1, ?2)",
            params![METADATA_KEY, metadata_json],
        )?;
        tx.commit()?;

        tracing::debug!(
            "Saved {} documents to {}",
            documents.len(),
            self.path.display()
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    /// Page count times page size, which includes pages still in the WAL
    fn size(&self) -> Result<Option<u64>> {
        let pages: i64 = self
            .conn
            .query_row("PRAGMA page_count", [], |row| row.get(0))?;
        let page_size: i64 = self
            .conn
            .query_row("PRAGMA page_size", [], |row| row.get(0))?;
        Ok(Some((pages * page_size) as u64))
    }
}
