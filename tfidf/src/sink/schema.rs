//! Database schema for the SQLite sink

use crate::error::Result;
use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i64 = 1;

/// SQL to create the database schema
const SCHEMA_SQL: &str = r#"
-- One row per document: its term -> score map, JSON encoded
CREATE TABLE IF NOT EXISTS search_index (
    identifier TEXT NOT NULL,
    index_dict TEXT NOT NULL,
    PRIMARY KEY(identifier)
);

-- Index state (schema version, index metadata)
CREATE TABLE IF NOT EXISTS index_state (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Ensure the database schema is up to date
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    let table_exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='index_state'",
        [],
        |row| row.get(0),
    )?;

    if !table_exists {
        conn.execute_batch(SCHEMA_SQL)?;

        conn.execute(
            "INSERT INTO index_state (key, value) VALUES ('schema_version', ?1)",
            [SCHEMA_VERSION.to_string()],
        )?;

        tracing::info!("Created database schema version {}", SCHEMA_VERSION);
    } else {
        let version: i64 = match conn.query_row(
            "SELECT CAST(value AS INTEGER) FROM index_state WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        ) {
            Ok(version) => version,
            Err(rusqlite::Error::QueryReturnedNoRows) => 0,
            Err(err) => return Err(err.into()),
        };

        if version < SCHEMA_VERSION {
            migrate(conn, version)?;
        }
    }

    Ok(())
}

/// Migrate from an older schema version
fn migrate(conn: &Connection, from_version: i64) -> Result<()> {
    tracing::info!(
        "Migrating database from version {} to {}",
        from_version,
        SCHEMA_VERSION
    );

    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR REPLACE INTO index_state (key, value) VALUES ('schema_version', ?1)",
        [SCHEMA_VERSION.to_string()],
    )?;

    Ok(())
}
