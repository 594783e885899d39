// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles for Truthlens tests.
//!
//! - [`MemoryStore`] - in-memory key-value store whose clones share contents,
//!   so a second handle behaves like the same storage after a restart
//! - [`MockDetector`] - detection service with scripted responses and call
//!   recording

pub mod memory_store;
pub mod mock_detector;

pub use memory_store::MemoryStore;
pub use mock_detector::MockDetector;
