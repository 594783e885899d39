// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory `KeyValueStore`.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use truthlens_core::{AdapterType, HealthStatus, KeyValueStore, PluginAdapter, TruthlensError};

/// Shared in-memory map. Cloning yields another handle on the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail, simulating a full or read-only disk.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `get` fail, simulating a locked database.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Copy of the current contents.
    pub async fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, TruthlensError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TruthlensError> {
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, TruthlensError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(TruthlensError::storage("simulated read failure"));
        }
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), TruthlensError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TruthlensError::storage("simulated write failure"));
        }
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), TruthlensError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, TruthlensError> {
        Ok(self
            .entries
            .lock()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clones_share_contents() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("token", "abc").await.unwrap();
        assert_eq!(other.get("token").await.unwrap().as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn failing_writes_leave_contents_untouched() {
        let store = MemoryStore::new();
        store.set("k", "v1").await.unwrap();
        store.fail_writes(true);
        assert!(store.set("k", "v2").await.is_err());
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v1"));
    }

    #[tokio::test]
    async fn failing_reads_report_an_error() {
        let store = MemoryStore::new();
        store.set("k", "v").await.unwrap();
        store.fail_reads(true);
        assert!(store.get("k").await.is_err());
        store.fail_reads(false);
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn prefix_listing_is_sorted() {
        let store = MemoryStore::new();
        store.set("history_b", "[]").await.unwrap();
        store.set("history_a", "[]").await.unwrap();
        store.set("token", "t").await.unwrap();
        assert_eq!(
            store.keys_with_prefix("history_").await.unwrap(),
            vec!["history_a", "history_b"]
        );
    }
}
