// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for the Truthlens client.
//!
//! A single `local_storage` table holds string values by key. Writes go
//! through tokio-rusqlite's background thread, so each `set`/`remove` has been
//! committed by the time its future resolves.

pub mod adapter;
pub mod database;
pub mod migrations;

pub use adapter::SqliteStore;
pub use database::Database;
