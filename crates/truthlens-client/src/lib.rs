// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP adapter for the Truthlens detection service.
//!
//! Implements [`truthlens_core::DetectorApi`] over reqwest: OAuth2-style form
//! login, JSON registration, bearer-authenticated identity lookup, and text
//! classification.

pub mod client;
pub mod types;

pub use client::DetectorClient;
