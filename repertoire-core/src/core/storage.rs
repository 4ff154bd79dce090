//! Key-value storage backends.
//!
//! The repository only needs string get/set by key. [`MemoryStore`] keeps
//! everything in a map (tests, ephemeral sessions); [`SqliteStore`] keeps a
//! single `kv_store` table in a SQLite file.

use crate::{RepertoireError, Result};
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

/// The storage contract: string values addressed by string keys.
pub trait KeyValueStore {
    /// The value stored under `key`, or `None` if nothing was ever stored there.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}

/// An in-process store backed by a `HashMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A store backed by one table in a SQLite database file.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Creates (or reuses) the database at `path` and makes sure the table exists.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    /// Opens an existing store at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RepertoireError::InvalidStore`] if the file has no `kv_store`
    /// table, or [`RepertoireError::Database`] if it is not a SQLite file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        let table_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name = 'kv_store'",
            [],
            |row| row.get(0),
        )?;

        if table_count != 1 {
            return Err(RepertoireError::InvalidStore(
                "Not a valid Repertoire database".to_string(),
            ));
        }

        Ok(Self { conn })
    }

    /// A store that lives only as long as this value.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueStore for SqliteStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value, chrono::Utc::now().timestamp()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_memory_store_get_and_set() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_item("k").unwrap(), None);
        store.set_item("k", "one").unwrap();
        store.set_item("k", "two").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_sqlite_store_persists_across_open() {
        let temp = NamedTempFile::new().unwrap();

        {
            let mut store = SqliteStore::create(temp.path()).unwrap();
            store.set_item("state", "{}").unwrap();
            store.set_item("state", "{\"a\":1}").unwrap();
        }

        let store = SqliteStore::open(temp.path()).unwrap();
        assert_eq!(store.get_item("state").unwrap().as_deref(), Some("{\"a\":1}"));
        assert_eq!(store.get_item("missing").unwrap(), None);

        let rows: i64 = store
            .connection()
            .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_open_rejects_foreign_database() {
        let temp = NamedTempFile::new().unwrap();
        {
            let conn = Connection::open(temp.path()).unwrap();
            conn.execute("CREATE TABLE notes (id TEXT PRIMARY KEY)", []).unwrap();
        }

        let result = SqliteStore::open(temp.path());
        assert!(matches!(result, Err(RepertoireError::InvalidStore(_))));
    }

    #[test]
    fn test_open_rejects_non_database_file() {
        let temp = NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "not a database").unwrap();

        assert!(SqliteStore::open(temp.path()).is_err());
    }

    #[test]
    fn test_in_memory_store() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.set_item("k", "v").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v"));
    }
}
