//! Key-value rows in the `kv_store` table.

use anyhow::{Context, Result};
use cinedeck_search::KeyValueStore;
use rusqlite::{Connection, OptionalExtension, params};

/// [`KeyValueStore`] over the `kv_store` table.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Wraps an already migrated connection (see [`crate::open_db`]).
    #[must_use]
    pub const fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("failed to read key {key}"))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = datetime('now')",
                params![key, value],
            )
            .with_context(|| format!("failed to write key {key}"))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])
            .with_context(|| format!("failed to delete key {key}"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use cinedeck_search::{HISTORY_KEY, SearchHistory};

    use super::*;
    use crate::open_db;

    fn temp_store(dir: &tempfile::TempDir) -> SqliteStore {
        SqliteStore::new(open_db(Some(dir.path())).unwrap())
    }

    #[test]
    fn test_set_get_overwrite_remove() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);

        // Act
        store.set("theme", "dark").unwrap();
        store.set("theme", "light").unwrap();
        let value = store.get("theme").unwrap();
        store.remove("theme").unwrap();

        // Assert
        assert_eq!(value.as_deref(), Some("light"));
        assert!(store.get("theme").unwrap().is_none());
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);

        // Act & Assert
        assert!(store.remove("missing").is_ok());
    }

    #[test]
    fn test_history_persists_across_connections() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut history = SearchHistory::load(temp_store(&dir));
        history.record("matrix");
        history.record("dune");
        drop(history);

        // Act
        let reopened = SearchHistory::load(temp_store(&dir));

        // Assert
        assert_eq!(reopened.entries(), ["dune", "matrix"]);
        assert_eq!(
            temp_store(&dir).get(HISTORY_KEY).unwrap().as_deref(),
            Some(r#"["dune","matrix"]"#)
        );
    }
}
