// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user analysis history, persisted as a JSON array under
//! `history_<email>`.
//!
//! Newest entry first, capped at [`HISTORY_LIMIT`]. Overflow evicts the oldest
//! entry (FIFO).

use std::sync::Arc;

use tracing::{debug, warn};
use truthlens_core::{AnalysisResult, HistoryKey, KeyValueStore, TruthlensError};

/// Maximum number of results kept per user.
pub const HISTORY_LIMIT: usize = 10;

/// Number of entries shown in the compact history view.
pub const RECENT_LIMIT: usize = 5;

/// Reads and writes history sequences in durable storage.
#[derive(Clone)]
pub struct HistoryCache {
    store: Arc<dyn KeyValueStore>,
}

impl HistoryCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The persisted sequence for `key`.
    ///
    /// Missing, unreadable, or malformed data all yield an empty sequence.
    pub async fn load(&self, key: &HistoryKey) -> Vec<AnalysisResult> {
        match self.store.get(key.as_str()).await {
            Ok(raw) => decode(key, raw.as_deref()),
            Err(e) => {
                warn!(key = %key, error = %e, "history read failed, treating as empty");
                Vec::new()
            }
        }
    }

    /// Prepend `entry`, keep the newest [`HISTORY_LIMIT`], persist, and return
    /// the updated sequence.
    ///
    /// Nothing is returned unless the write succeeded. A failed read aborts
    /// the append so the stored sequence is never overwritten from a blank.
    pub async fn append(
        &self,
        key: &HistoryKey,
        entry: AnalysisResult,
    ) -> Result<Vec<AnalysisResult>, TruthlensError> {
        let raw = self.store.get(key.as_str()).await?;
        let mut entries = decode(key, raw.as_deref());
        entries.insert(0, entry);
        entries.truncate(HISTORY_LIMIT);

        let encoded = serde_json::to_string(&entries)
            .map_err(|e| TruthlensError::Internal(format!("history encoding failed: {e}")))?;
        self.store.set(key.as_str(), &encoded).await?;

        debug!(key = %key, len = entries.len(), "history persisted");
        Ok(entries)
    }

    /// Remove the persisted sequence for `key`.
    pub async fn clear(&self, key: &HistoryKey) -> Result<(), TruthlensError> {
        self.store.remove(key.as_str()).await
    }

    /// History keys on this device that do not belong to `current`.
    pub async fn stale_keys(
        &self,
        current: Option<&HistoryKey>,
    ) -> Result<Vec<String>, TruthlensError> {
        let keys = self.store.keys_with_prefix(HistoryKey::PREFIX).await?;
        Ok(keys
            .into_iter()
            .filter(|k| current.is_none_or(|c| c.as_str() != k))
            .collect())
    }
}

/// Parse a stored sequence. Missing or malformed data is empty.
fn decode(key: &HistoryKey, raw: Option<&str>) -> Vec<AnalysisResult> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<AnalysisResult>>(raw) {
        Ok(mut entries) => {
            entries.truncate(HISTORY_LIMIT);
            entries
        }
        Err(e) => {
            warn!(key = %key, error = %e, "malformed history, treating as empty");
            Vec::new()
        }
    }
}

/// The first [`RECENT_LIMIT`] entries of a history sequence.
pub fn recent(entries: &[AnalysisResult]) -> &[AnalysisResult] {
    &entries[..entries.len().min(RECENT_LIMIT)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::{Normalizer, Submission};
    use chrono::Utc;
    use truthlens_core::{InputType, Label};
    use truthlens_test_utils::MemoryStore;

    fn entry(id: u64) -> AnalysisResult {
        let submission = Submission::new(InputType::Content, format!("article {id}"));
        Normalizer::fixed().normalize(Label::Fake, &submission, id, Utc::now())
    }

    fn cache(store: &MemoryStore) -> HistoryCache {
        HistoryCache::new(Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn load_missing_is_empty() {
        let store = MemoryStore::new();
        let key = HistoryKey::for_email("a@b.tw");
        assert!(cache(&store).load(&key).await.is_empty());
    }

    #[tokio::test]
    async fn malformed_data_is_empty() {
        let store = MemoryStore::new();
        let key = HistoryKey::for_email("a@b.tw");
        store.set(key.as_str(), "{not json").await.unwrap();
        assert!(cache(&store).load(&key).await.is_empty());

        store.set(key.as_str(), r#"[{"id": "wrong shape"}]"#).await.unwrap();
        assert!(cache(&store).load(&key).await.is_empty());
    }

    #[tokio::test]
    async fn eleven_appends_keep_ten_newest_first() {
        let store = MemoryStore::new();
        let history = cache(&store);
        let key = HistoryKey::for_email("a@b.tw");

        let mut last = Vec::new();
        for id in 1..=11 {
            last = history.append(&key, entry(id)).await.unwrap();
        }

        assert_eq!(last.len(), HISTORY_LIMIT);
        let ids: Vec<u64> = last.iter().map(|e| e.id).collect();
        assert_eq!(ids, (2..=11).rev().collect::<Vec<_>>());
        assert!(!ids.contains(&1));
    }

    #[tokio::test]
    async fn append_then_load_survives_reload() {
        let store = MemoryStore::new();
        let key = HistoryKey::for_email("a@b.tw");
        let appended = {
            let history = cache(&store);
            history.append(&key, entry(1)).await.unwrap();
            history.append(&key, entry(2)).await.unwrap()
        };

        // A fresh cache over another handle on the same storage.
        let reloaded = HistoryCache::new(Arc::new(store.clone())).load(&key).await;
        assert_eq!(reloaded, appended);
    }

    #[tokio::test]
    async fn failed_write_returns_error() {
        let store = MemoryStore::new();
        let key = HistoryKey::for_email("a@b.tw");
        store.fail_writes(true);
        assert!(cache(&store).append(&key, entry(1)).await.is_err());
        store.fail_writes(false);
        assert!(cache(&store).load(&key).await.is_empty());
    }

    #[tokio::test]
    async fn failed_read_during_append_keeps_stored_history() {
        let store = MemoryStore::new();
        let history = cache(&store);
        let key = HistoryKey::for_email("a@b.tw");
        for id in 1..=9 {
            history.append(&key, entry(id)).await.unwrap();
        }

        store.fail_reads(true);
        assert!(history.append(&key, entry(10)).await.is_err());
        assert!(history.load(&key).await.is_empty());
        store.fail_reads(false);

        let stored = history.load(&key).await;
        assert_eq!(stored.len(), 9);
        assert_eq!(stored[0].id, 9);
    }

    #[tokio::test]
    async fn histories_are_per_user() {
        let store = MemoryStore::new();
        let history = cache(&store);
        let amy = HistoryKey::for_email("amy@b.tw");
        let bob = HistoryKey::for_email("bob@b.tw");
        history.append(&amy, entry(1)).await.unwrap();

        assert!(history.load(&bob).await.is_empty());
        assert_eq!(history.stale_keys(Some(&bob)).await.unwrap(), vec!["history_amy@b.tw"]);
        assert!(history.stale_keys(Some(&amy)).await.unwrap().is_empty());

        history.clear(&amy).await.unwrap();
        assert!(history.load(&amy).await.is_empty());
    }

    #[test]
    fn recent_caps_at_five() {
        let entries: Vec<_> = (1..=8).map(entry).collect();
        assert_eq!(recent(&entries).len(), RECENT_LIMIT);
        assert_eq!(recent(&entries[..2]).len(), 2);
    }
}
