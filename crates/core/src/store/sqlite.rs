use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{schema, KeyValueStore};
use crate::error::{Error, Result};

/// SQLite-backed key-value store. Queries run on tokio's blocking pool.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open or create a store at the given path with WAL mode.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        schema::initialize(&conn)?;
        schema::migrate(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        schema::migrate(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// All keys with their last write time, sorted by key.
    pub async fn keys(&self) -> Result<Vec<(String, DateTime<Utc>)>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT key, updated_at FROM kv ORDER BY key")?;
            let rows = stmt
                .query_map([], |row| {
                    let key: String = row.get(0)?;
                    let ts: i64 = row.get(1)?;
                    Ok((key, ts))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows
                .into_iter()
                .map(|(key, ts)| (key, DateTime::from_timestamp(ts, 0).unwrap_or_default()))
                .collect())
        })
        .await
    }

    fn with_conn<T, F>(&self, f: F) -> impl Future<Output = Result<T>> + Send
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        async move {
            tokio::task::spawn_blocking(move || {
                let guard = conn
                    .lock()
                    .map_err(|_| Error::StoreUnavailable("connection lock poisoned".into()))?;
                f(&guard)
            })
            .await?
        }
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send {
        let key = key.to_string();
        self.with_conn(move |conn| {
            let value = conn
                .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                    row.get(0)
                })
                .optional()?;
            Ok(value)
        })
    }

    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<()>> + Send {
        let key = key.to_string();
        let now = Utc::now().timestamp();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, now],
            )?;
            Ok(())
        })
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get("uploaded_images").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("favorites", "[\"a\"]".to_string()).await.unwrap();
        assert_eq!(
            store.get("favorites").await.unwrap(),
            Some("[\"a\"]".to_string())
        );
    }

    #[tokio::test]
    async fn test_set_overwrite() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("k", "old".to_string()).await.unwrap();
        store.set("k", "new".to_string()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("new".to_string()));
        assert_eq!(store.keys().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("uploaded_images", "[]".to_string()).await.unwrap();
        store.set("favorites", "[\"x\"]".to_string()).await.unwrap();

        let keys: Vec<String> = store.keys().await.unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["favorites", "uploaded_images"]);
        assert_eq!(store.get("uploaded_images").await.unwrap(), Some("[]".to_string()));
    }

    #[tokio::test]
    async fn test_data_survives_close_and_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("nested/dir/gallery.db");

        {
            let store = SqliteStore::open(&db_path).unwrap();
            store.set("uploaded_images", "[1]".to_string()).await.unwrap();
        }
        assert!(db_path.exists());
        {
            let store = SqliteStore::open(&db_path).unwrap();
            assert_eq!(store.path(), Some(db_path.as_path()));
            assert_eq!(
                store.get("uploaded_images").await.unwrap(),
                Some("[1]".to_string())
            );
        }
    }

    // ── Schema version tracking ─────────────────────────────────

    fn stored_version(conn: &Connection) -> Option<String> {
        conn.query_row(
            "SELECT value FROM meta WHERE key = 'schema_version'",
            [],
            |r| r.get(0),
        )
        .ok()
    }

    #[test]
    fn test_schema_version_set_on_fresh_db() {
        let conn = Connection::open_in_memory().unwrap();
        schema::initialize(&conn).unwrap();
        assert!(stored_version(&conn).is_none());

        schema::migrate(&conn).unwrap();
        assert_eq!(stored_version(&conn), Some("1".to_string()));
    }

    #[test]
    fn test_reject_future_schema_version() {
        let conn = Connection::open_in_memory().unwrap();
        schema::initialize(&conn).unwrap();
        conn.execute(
            "INSERT INTO meta (key, value) VALUES ('schema_version', '999')",
            [],
        )
        .unwrap();

        let err = schema::migrate(&conn).unwrap_err();
        assert!(matches!(err, Error::SchemaTooNew { db: 999, code: 1 }));
    }

    #[test]
    fn test_migration_check_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        schema::initialize(&conn).unwrap();
        schema::migrate(&conn).unwrap();
        schema::migrate(&conn).unwrap();
        assert_eq!(stored_version(&conn), Some("1".to_string()));
    }

    #[test]
    fn test_schema_tables_exist() {
        let conn = Connection::open_in_memory().unwrap();
        schema::initialize(&conn).unwrap();
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        let tables: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(tables, vec!["kv", "meta"]);
    }
}
