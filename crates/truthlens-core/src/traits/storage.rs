// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable local key-value storage.

use async_trait::async_trait;

use crate::error::TruthlensError;
use crate::traits::adapter::PluginAdapter;

/// A persistent string-to-string store surviving process restarts.
///
/// Holds the bearer token under `token` and each user's history under
/// `history_<email>`. Every write has completed (or failed) by the time the
/// returned future resolves.
#[async_trait]
pub trait KeyValueStore: PluginAdapter {
    /// Returns the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, TruthlensError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), TruthlensError>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), TruthlensError>;

    /// Lists every stored key starting with `prefix`, sorted.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, TruthlensError>;
}
