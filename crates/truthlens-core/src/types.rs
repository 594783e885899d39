// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the adapters, the application core, and the CLI.

use std::fmt;

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Detector,
}

// --- Session types ---

/// Opaque bearer credential issued by the login endpoint.
///
/// `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw token, for the `Authorization` header and durable storage only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Identity record returned by the identity lookup endpoint.
///
/// `email` and `name` are always present; anything else the service sends is
/// kept in `extra` so it survives a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserProfile {
    /// Storage key under which this user's history is persisted.
    pub fn history_key(&self) -> HistoryKey {
        HistoryKey::for_email(&self.email)
    }
}

/// Durable storage key of one user's analysis history (`history_<email>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HistoryKey(String);

impl HistoryKey {
    /// Prefix shared by every history key.
    pub const PREFIX: &'static str = "history_";

    pub fn for_email(email: &str) -> Self {
        Self(format!("{}{email}", Self::PREFIX))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HistoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Email and password submitted to the login endpoint.
#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

/// Account details submitted to the registration endpoint.
#[derive(Debug)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: SecretString,
}

// --- Classification types ---

/// The classifier's two-way verdict.
///
/// The deployed service answers with the Chinese characters `真` (real) and
/// `假` (fake); both spellings are accepted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum Label {
    #[serde(rename = "real", alias = "真")]
    #[strum(to_string = "real", serialize = "真")]
    Real,
    #[serde(rename = "fake", alias = "假")]
    #[strum(to_string = "fake", serialize = "假")]
    Fake,
}

impl Label {
    pub fn is_fake(self) -> bool {
        self == Label::Fake
    }
}

/// What a successful (2xx) classification response contained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The service produced a verdict.
    Verdict(Label),
    /// The service reported an application-level error in the body.
    Rejected(String),
}

/// Whether the submitted text is a link or the article body itself.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InputType {
    Url,
    Content,
}

/// Coarse risk tier derived from the fake score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// `high` above 60, `medium` above 30, otherwise `low`.
    pub fn from_fake_score(fake_score: u8) -> Self {
        if fake_score > 60 {
            RiskLevel::High
        } else if fake_score > 30 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// One-sentence advice shown under the verdict.
    pub fn advice(self) -> &'static str {
        match self {
            RiskLevel::High => {
                "This content carries a high risk of being fake news. Check several reliable sources before sharing it."
            }
            RiskLevel::Medium => {
                "Treat this content with caution and look into its background before relying on it."
            }
            RiskLevel::Low => {
                "This content looks relatively credible, but keep thinking critically and cross-check it."
            }
        }
    }
}

/// Four fixed-vocabulary remarks describing the verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisNarrative {
    pub source: String,
    pub content: String,
    pub structure: String,
    pub language: String,
}

/// Supplementary display details attached to every result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDetails {
    pub keywords: Vec<String>,
    pub source_analysis: String,
}

/// The display-ready view-model built from a single classifier label.
///
/// Serialized in camelCase; this is also the on-disk history record format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub input_type: InputType,
    pub content_preview: String,
    pub fake_score: u8,
    pub real_score: u8,
    pub confidence: u8,
    pub risk_level: RiskLevel,
    pub analysis_narrative: AnalysisNarrative,
    pub recommendations: Vec<String>,
    pub details: AnalysisDetails,
}

// --- Notification types ---

/// Severity of a user-facing notification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
}

impl Severity {
    /// All severities, in table order.
    pub const ALL: [Severity; 3] = [Severity::Success, Severity::Error, Severity::Info];

    /// Position of this severity in per-severity lookup tables.
    pub const fn index(self) -> usize {
        match self {
            Severity::Success => 0,
            Severity::Error => 1,
            Severity::Info => 2,
        }
    }
}
