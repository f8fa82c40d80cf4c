/// SQLite-backed document store
use super::DocumentStore;
use crate::error::{AmoraError, AmoraResult};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool};
use std::path::Path;

/// Connection options
#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    pub enable_wal: bool,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self { enable_wal: true }
    }
}

/// Documents stored as rows of a single `documents` table
#[derive(Clone)]
pub struct SqliteStore {
    db: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and run migrations
    pub async fn open(path: &Path, options: DatabaseOptions) -> AmoraResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let pool = SqlitePool::connect_with(
            SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(if options.enable_wal {
                    SqliteJournalMode::Wal
                } else {
                    SqliteJournalMode::Delete
                })
                .busy_timeout(std::time::Duration::from_secs(5)),
        )
        .await?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, running migrations on it
    pub async fn from_pool(db: SqlitePool) -> AmoraResult<Self> {
        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .map_err(|e| AmoraError::Internal(format!("Migration failed: {}", e)))?;

        Ok(Self { db })
    }

    /// Test database connection
    pub async fn ping(&self) -> AmoraResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn get(&self, key: &str) -> AmoraResult<Option<String>> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM documents WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.db)
            .await?;

        Ok(value)
    }

    async fn put(&self, key: &str, document: String) -> AmoraResult<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(document)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> AmoraResult<()> {
        sqlx::query("DELETE FROM documents WHERE key = ?")
            .bind(key)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    async fn clear(&self) -> AmoraResult<()> {
        sqlx::query("DELETE FROM documents").execute(&self.db).await?;
        Ok(())
    }

    async fn keys(&self) -> AmoraResult<Vec<String>> {
        let keys = sqlx::query_scalar::<_, String>("SELECT key FROM documents ORDER BY key")
            .fetch_all(&self.db)
            .await?;

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("amora.sqlite"), DatabaseOptions::default())
            .await
            .unwrap();
        store.ping().await.unwrap();

        assert!(store.get("isPremium").await.unwrap().is_none());

        store.put("isPremium", "false".to_string()).await.unwrap();
        store.put("isPremium", "true".to_string()).await.unwrap();
        assert_eq!(store.get("isPremium").await.unwrap().as_deref(), Some("true"));

        store.put("blockedUsers", "[\"3\"]".to_string()).await.unwrap();
        assert_eq!(store.keys().await.unwrap(), vec!["blockedUsers", "isPremium"]);

        store.remove("isPremium").await.unwrap();
        assert!(store.get("isPremium").await.unwrap().is_none());

        store.clear().await.unwrap();
        assert!(store.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_in_memory_pool() {
        // One connection, or each pooled connection gets its own empty database
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let store = SqliteStore::from_pool(pool).await.unwrap();

        store.put("authData", "{}".to_string()).await.unwrap();
        assert_eq!(store.get("authData").await.unwrap().as_deref(), Some("{}"));
    }
}
