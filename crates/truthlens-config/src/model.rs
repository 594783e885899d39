// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of being silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level Truthlens configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TruthlensConfig {
    /// Client-wide settings.
    #[serde(default)]
    pub client: ClientConfig,

    /// Remote detection service endpoints.
    #[serde(default)]
    pub api: ApiConfig,

    /// Durable local storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Result normalization settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Notification display settings.
    #[serde(default)]
    pub notifications: NotificationConfig,

    /// Transport security settings.
    #[serde(default)]
    pub security: SecurityConfig,
}

/// Client-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Endpoints of the remote detection service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Scheme, host, and optional port of the service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Identity lookup (`GET`, bearer).
    #[serde(default = "default_identity_path")]
    pub identity_path: String,

    /// Login (`POST`, form-encoded).
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Registration (`POST`, JSON).
    #[serde(default = "default_register_path")]
    pub register_path: String,

    /// Classification (`POST`, JSON, bearer).
    #[serde(default = "default_classify_path")]
    pub classify_path: String,

    /// Per-request timeout. Unset means requests may wait indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            identity_path: default_identity_path(),
            login_path: default_login_path(),
            register_path: default_register_path(),
            classify_path: default_classify_path(),
            timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    "https://nknu115-project.onrender.com".to_string()
}

fn default_identity_path() -> String {
    "/api/users/me".to_string()
}

fn default_login_path() -> String {
    "/api/users/login".to_string()
}

fn default_register_path() -> String {
    "/api/users/register".to_string()
}

fn default_classify_path() -> String {
    "/predict".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database holding the token and history.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("truthlens").join("truthlens.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("truthlens.db"))
        .to_string_lossy()
        .into_owned()
}

/// How scores are derived from the classifier's binary label.
///
/// The two policies are alternatives; exactly one is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringPolicy {
    /// Representative constants: fake 85, real 15, confidence 92.
    #[default]
    Fixed,
    /// Random draw within a band per label: fake 75-94, real 5-24, confidence 85-99.
    Banded,
}

/// Result normalization settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Active scoring policy.
    #[serde(default)]
    pub scoring: ScoringPolicy,

    /// Seed for the banded policy's RNG. Unset draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Classifier name quoted in each result's source analysis line.
    #[serde(default = "default_classifier_name")]
    pub classifier_name: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringPolicy::default(),
            seed: None,
            classifier_name: default_classifier_name(),
        }
    }
}

fn default_classifier_name() -> String {
    "RoBERTa".to_string()
}

/// Notification display settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationConfig {
    /// Seconds a notification stays visible before it expires.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    3
}

/// Transport security configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityConfig {
    /// Require HTTPS for any non-loopback base URL.
    #[serde(default = "default_require_tls")]
    pub require_tls: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            require_tls: default_require_tls(),
        }
    }
}

fn default_require_tls() -> bool {
    true
}
