// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits at the seams between the application core and the outside world.
//!
//! Both adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` so they can live behind `Arc<dyn ...>`.

pub mod adapter;
pub mod detector;
pub mod storage;

pub use adapter::PluginAdapter;
pub use detector::DetectorApi;
pub use storage::KeyValueStore;
