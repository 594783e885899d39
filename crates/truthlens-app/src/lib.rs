// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Application core of the Truthlens client.
//!
//! - [`SessionStore`] - token persistence, sign-in, registration, sign-out
//! - [`HistoryCache`] - per-user result history in durable storage
//! - [`Normalizer`] - turns a classifier label into an `AnalysisResult`
//! - [`Notifier`] - single-slot expiring notifications and UI events
//! - [`Orchestrator`] - the analysis workflow tying these together

pub mod history;
pub mod normalizer;
pub mod notify;
pub mod orchestrator;
pub mod session;

pub use history::{HISTORY_LIMIT, HistoryCache, RECENT_LIMIT};
pub use normalizer::{Normalizer, Submission, content_preview};
pub use notify::{Notification, Notifier, UiEvent};
pub use orchestrator::{AnalysisPhase, Orchestrator};
pub use session::{Session, SessionStore, TOKEN_KEY};
