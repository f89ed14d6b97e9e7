//! `SQLite`-backed slot store.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::{migrations, SlotStore};

/// Slot store persisted in a `SQLite` database file.
#[derive(Debug)]
pub struct SqliteSlotStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl SqliteSlotStore {
    /// Open or create a slot database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory slot database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SlotStore for SqliteSlotStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r"
            INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value],
        )?;
        debug!("Wrote {} bytes to slot '{}'", value.len(), key);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM slots WHERE key = ?1", [key])?;
        Ok(affected > 0)
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM slots ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SqliteSlotStore {
        SqliteSlotStore::open_in_memory().expect("failed to create test store")
    }

    #[test]
    fn test_open_in_memory() {
        let store = create_test_store();
        assert_eq!(store.path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_get_missing_slot() {
        let store = create_test_store();
        assert!(store.get("run_db").unwrap().is_none());
    }

    #[test]
    fn test_set_and_get() {
        let mut store = create_test_store();
        store.set("run_db", "[]").unwrap();
        assert_eq!(store.get("run_db").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_set_overwrites() {
        let mut store = create_test_store();
        store.set("run_db", "[1]").unwrap();
        store.set("run_db", "[2]").unwrap();

        assert_eq!(store.get("run_db").unwrap().as_deref(), Some("[2]"));
        assert_eq!(store.keys().unwrap().len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut store = create_test_store();
        store.set("run_db", "[]").unwrap();

        assert!(store.remove("run_db").unwrap());
        assert!(!store.remove("run_db").unwrap());
        assert!(store.get("run_db").unwrap().is_none());
    }

    #[test]
    fn test_keys() {
        let mut store = create_test_store();
        store.set("zeta", "").unwrap();
        store.set("alpha", "").unwrap();

        assert_eq!(store.keys().unwrap(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_unicode_value() {
        let mut store = create_test_store();
        store.set("run_db", "Hello 世界 🌍").unwrap();
        assert_eq!(
            store.get("run_db").unwrap().as_deref(),
            Some("Hello 世界 🌍")
        );
    }

    #[test]
    fn test_open_file_based_persists() {
        let db_path =
            std::env::temp_dir().join(format!("runlog_slot_test_{}.db", std::process::id()));
        let _ = std::fs::remove_file(&db_path);

        {
            let mut store = SqliteSlotStore::open(&db_path).unwrap();
            store.set("run_db", "[]").unwrap();
            assert_eq!(store.path(), db_path);
        }

        let store = SqliteSlotStore::open(&db_path).unwrap();
        assert_eq!(store.get("run_db").unwrap().as_deref(), Some("[]"));

        drop(store);
        let _ = std::fs::remove_file(&db_path);
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let root = std::env::temp_dir().join(format!("runlog_test_{}", std::process::id()));
        let nested_path = root.join("nested/runlog.db");
        let _ = std::fs::remove_dir_all(&root);

        let store = SqliteSlotStore::open(&nested_path).unwrap();
        assert!(nested_path.exists());

        drop(store);
        let _ = std::fs::remove_dir_all(&root);
    }
}
