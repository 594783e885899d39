// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the KeyValueStore trait.

use async_trait::async_trait;
use rusqlite::{OptionalExtension, params};
use tokio::sync::OnceCell;
use tracing::debug;

use truthlens_config::model::StorageConfig;
use truthlens_core::{
    AdapterType, HealthStatus, KeyValueStore, PluginAdapter, TruthlensError,
};

use crate::database::{Database, map_tr_err};

/// SQLite-backed key-value store.
///
/// The database file is opened and migrated on first use, so constructing a
/// store never touches the filesystem.
pub struct SqliteStore {
    path: String,
    db: OnceCell<Database>,
}

impl SqliteStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self::at_path(config.database_path.clone())
    }

    pub fn at_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            db: OnceCell::new(),
        }
    }

    /// Wrap an already opened database.
    pub fn from_database(db: Database) -> Self {
        Self {
            path: ":memory:".to_string(),
            db: OnceCell::new_with(Some(db)),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    async fn db(&self) -> Result<&Database, TruthlensError> {
        self.db
            .get_or_try_init(|| async {
                let db = Database::open(&self.path).await?;
                debug!(path = %self.path, "SQLite store initialized");
                Ok(db)
            })
            .await
    }
}

#[async_trait]
impl PluginAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, TruthlensError> {
        let db = match self.db().await {
            Ok(db) => db,
            Err(e) => return Ok(HealthStatus::Unhealthy(e.to_string())),
        };
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TruthlensError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, TruthlensError> {
        let key = key.to_string();
        self.db()
            .await?
            .connection()
            .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
                conn.query_row(
                    "SELECT value FROM local_storage WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()
            })
            .await
            .map_err(map_tr_err)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), TruthlensError> {
        let key = key.to_string();
        let value = value.to_string();
        let now = chrono::Utc::now()
            .format("%Y-%m-%dT%H:%M:%S%.3fZ")
            .to_string();
        self.db()
            .await?
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO local_storage (key, value, updated_at) VALUES (?1, ?2, ?3)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                    params![key, value, now],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn remove(&self, key: &str) -> Result<(), TruthlensError> {
        let key = key.to_string();
        self.db()
            .await?
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute("DELETE FROM local_storage WHERE key = ?1", params![key])?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, TruthlensError> {
        let prefix = prefix.to_string();
        self.db()
            .await?
            .connection()
            .call(move |conn| -> Result<Vec<String>, rusqlite::Error> {
                // substr avoids LIKE wildcards in emails ('_' is common).
                let mut stmt = conn.prepare(
                    "SELECT key FROM local_storage
                     WHERE substr(key, 1, length(?1)) = ?1
                     ORDER BY key",
                )?;
                let rows = stmt.query_map(params![prefix], |row| row.get::<_, String>(0))?;
                rows.collect()
            })
            .await
            .map_err(map_tr_err)
    }
}
