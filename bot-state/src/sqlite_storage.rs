//! SQLite-backed [`Storage`]: one row per state document.
//!
//! External: SQLite via sqlx. Writes run in a transaction so the eTag check and the upsert
//! see the same row.

use crate::error::StorageError;
use crate::sqlite_pool::SqlitePoolManager;
use crate::storage::{check_etag, stamp_etag, Storage};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(Clone)]
pub struct SqliteStorage {
    pool_manager: SqlitePoolManager,
}

impl SqliteStorage {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let storage = Self { pool_manager };
        storage.init().await?;
        Ok(storage)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating bot_state table if not exist");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS bot_state (
                key TEXT PRIMARY KEY,
                document TEXT NOT NULL,
                etag TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(self.pool_manager.pool())
        .await?;

        Ok(())
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn read(&self, keys: &[String]) -> Result<HashMap<String, Value>, StorageError> {
        let pool = self.pool_manager.pool();
        let mut found = HashMap::with_capacity(keys.len());

        for key in keys {
            let row: Option<(String,)> =
                sqlx::query_as("SELECT document FROM bot_state WHERE key = ?")
                    .bind(key)
                    .fetch_optional(pool)
                    .await?;
            if let Some((document,)) = row {
                found.insert(key.clone(), serde_json::from_str(&document)?);
            }
        }

        Ok(found)
    }

    async fn write(
        &self,
        changes: HashMap<String, Value>,
    ) -> Result<HashMap<String, String>, StorageError> {
        let mut tx = self.pool_manager.pool().begin().await?;
        let mut etags = HashMap::with_capacity(changes.len());

        for (key, document) in changes {
            let stored: Option<(String,)> =
                sqlx::query_as("SELECT etag FROM bot_state WHERE key = ?")
                    .bind(&key)
                    .fetch_optional(&mut *tx)
                    .await?;
            check_etag(&key, &document, stored.as_ref().map(|(etag,)| etag.as_str()))?;

            let (document, etag) = stamp_etag(&key, document)?;
            sqlx::query(
                r#"
                INSERT INTO bot_state (key, document, etag, updated_at)
                VALUES (?, ?, ?, ?)
                ON CONFLICT(key) DO UPDATE SET
                    document = excluded.document,
                    etag = excluded.etag,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(&key)
            .bind(serde_json::to_string(&document)?)
            .bind(&etag)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

            debug!(key = %key, etag = %etag, "Wrote state document");
            etags.insert(key, etag);
        }

        tx.commit().await?;
        Ok(etags)
    }

    async fn delete(&self, keys: &[String]) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();
        for key in keys {
            sqlx::query("DELETE FROM bot_state WHERE key = ?")
                .bind(key)
                .execute(pool)
                .await?;
        }
        Ok(())
    }
}
